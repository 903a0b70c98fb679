/// Property-based tests for service registration
///
/// These tests use proptest to generate random inputs and verify invariants
/// that should hold for all registration sequences.

use strand_di::{Container, DiError, FactoryKind, Resolver};
use proptest::prelude::*;
use std::sync::Arc;

// Test data structures
#[derive(Debug, Clone, PartialEq)]
struct TestService {
    id: u32,
    name: String,
}

#[derive(Debug, Clone, PartialEq)]
struct ConfigService {
    value: i32,
}

// Registers one of a fixed set of identities, picked by `slot`.
fn register_slot(container: &Container, slot: u8, value: u32) -> Result<Container, DiError> {
    match slot % 4 {
        0 => container.try_register_instance(value),
        1 => container.try_register_instance(value as u64),
        2 => container.try_register_factory(move |_| TestService {
            id: value,
            name: format!("service_{}", value),
        }),
        _ => container.try_register_cached(move |_| ConfigService { value: value as i32 }),
    }
}

// Property: registering the same identity twice in one chain always fails
proptest! {
    #[test]
    fn duplicate_identity_always_rejected(first in 0u32..1000, second in 0u32..1000) {
        let container = Container::new().register_instance(TestService {
            id: first,
            name: format!("service_{}", first),
        });

        let result = container.try_register_instance(TestService {
            id: second,
            name: format!("service_{}", second),
        });

        prop_assert!(matches!(result, Err(DiError::DuplicateRegistration(_))));
        // The first registration is still the one served
        prop_assert_eq!(container.get_required::<TestService>().id, first);
    }
}

// Property: any order of distinct identities registers and resolves cleanly
proptest! {
    #[test]
    fn distinct_identities_never_conflict(
        order in Just(vec![0u8, 1, 2, 3]).prop_shuffle(),
        value in 0u32..10_000,
    ) {
        let mut container = Container::new();
        for slot in &order {
            container = register_slot(&container, *slot, value).unwrap();
        }

        prop_assert_eq!(container.len(), 4);
        prop_assert_eq!(*container.get_required::<u32>(), value);
        prop_assert_eq!(*container.get_required::<u64>(), value as u64);
        prop_assert_eq!(container.get_required::<TestService>().id, value);
        prop_assert_eq!(container.get_required::<ConfigService>().value, value as i32);
    }
}

// Property: a sequence of slots registers until the first repeat, then fails
proptest! {
    #[test]
    fn repeats_fail_exactly_when_identity_seen(slots in prop::collection::vec(0u8..4, 1..12)) {
        let mut container = Container::new();
        let mut seen = Vec::new();

        for slot in slots {
            let identity = slot % 4;
            match register_slot(&container, slot, 1) {
                Ok(next) => {
                    prop_assert!(!seen.contains(&identity));
                    seen.push(identity);
                    container = next;
                }
                Err(DiError::DuplicateRegistration(_)) => {
                    prop_assert!(seen.contains(&identity));
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }

        prop_assert_eq!(container.len(), seen.len());
    }
}

// Property: instances come back pointer-equal no matter how many resolutions
proptest! {
    #[test]
    fn instance_identity_preserved(value in any::<i32>(), resolutions in 1usize..20) {
        let container = Container::new().register_instance(ConfigService { value });
        let first = container.get_required::<ConfigService>();

        for _ in 0..resolutions {
            let again = container.get_required::<ConfigService>();
            prop_assert!(Arc::ptr_eq(&first, &again));
        }
        prop_assert_eq!(first.value, value);
    }
}

// Property: registration never changes the receiver
proptest! {
    #[test]
    fn receiver_unchanged_by_registration(slots in prop::collection::vec(0u8..4, 0..8)) {
        let mut history = vec![Container::new()];
        for slot in slots {
            let current = history.last().unwrap().clone();
            if let Ok(next) = register_slot(&current, slot, 7) {
                history.push(next);
            }
        }

        for (len, container) in history.iter().enumerate() {
            prop_assert_eq!(container.len(), len);
        }
    }
}

// Property: descriptors mirror registration order and kinds
proptest! {
    #[test]
    fn descriptors_follow_insertion_order(order in Just(vec![0u8, 1, 2, 3]).prop_shuffle()) {
        let mut container = Container::new();
        for slot in &order {
            container = register_slot(&container, *slot, 0).unwrap();
        }

        let kinds: Vec<FactoryKind> = container.descriptors().iter().map(|d| d.kind).collect();
        let expected: Vec<FactoryKind> = order
            .iter()
            .map(|slot| match slot {
                0 | 1 => FactoryKind::Instance,
                2 => FactoryKind::Basic,
                _ => FactoryKind::Cached,
            })
            .collect();
        prop_assert_eq!(kinds, expected);
    }
}
