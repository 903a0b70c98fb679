#![no_main]

use libfuzzer_sys::fuzz_target;
use strand_di::{Container, DiError, Resolver};

#[derive(Debug)]
struct TestService {
    value: i32,
}

struct Slot<const N: usize>(u8);

fn try_register(container: &Container, op: u8, value: i32) -> Result<Container, DiError> {
    match op % 6 {
        0 => container.try_register_instance(TestService { value }),
        1 => container.try_register_factory(move |_| TestService { value }),
        2 => container.try_register_cached(move |_| TestService { value }),
        3 => container.try_register_instance(Slot::<0>(op)),
        4 => container.try_register_instance(Slot::<1>(op)),
        _ => container.try_register_fallible(move |r| Ok(Slot::<2>(r.get::<Slot<0>>()?.0))),
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let value = i32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let mut container = Container::new();
    let mut registered = [false; 4];

    for &op in &data[4..] {
        let identity = match op % 6 {
            0..=2 => 0,
            3 => 1,
            4 => 2,
            _ => 3,
        };
        let before = container.len();

        match try_register(&container, op, value) {
            Ok(next) => {
                assert!(!registered[identity]);
                assert_eq!(next.len(), before + 1);
                assert_eq!(container.len(), before);
                registered[identity] = true;
                container = next;
            }
            Err(DiError::DuplicateRegistration(_)) => assert!(registered[identity]),
            Err(other) => panic!("unexpected registration error: {}", other),
        }
    }

    if registered[0] {
        assert_eq!(container.get::<TestService>().unwrap().value, value);
    }
    if registered[3] {
        assert_eq!(container.get::<Slot<2>>().is_ok(), registered[1]);
    }
});
