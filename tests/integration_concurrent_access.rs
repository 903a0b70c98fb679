/// Concurrent access integration tests
///
/// These tests verify that strand-di behaves correctly under concurrent access:
/// shared instances stay shared, per-resolution factories stay fresh, cached
/// registrations construct once and cycle tracking stays per thread.

use strand_di::{Container, DiError, Resolver};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;

// ===== Test Services =====

#[derive(Debug)]
pub struct CounterService {
    count: AtomicU32,
}

impl CounterService {
    pub fn new() -> Self {
        Self {
            count: AtomicU32::new(0),
        }
    }

    pub fn increment(&self) -> u32 {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get_count(&self) -> u32 {
        self.count.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct SharedResource {
    data: Mutex<Vec<String>>,
}

impl SharedResource {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(Vec::new()),
        }
    }

    pub fn add_entry(&self, entry: String) {
        self.data.lock().unwrap().push(entry);
    }

    pub fn len(&self) -> usize {
        self.data.lock().unwrap().len()
    }
}

#[derive(Debug)]
pub struct Worker {
    id: u32,
    counter: Arc<CounterService>,
}

// ===== Integration Tests =====

#[test]
fn test_instance_thread_safety() {
    let container = Arc::new(
        Container::new()
            .register_instance(CounterService::new())
            .register_instance(SharedResource::new()),
    );
    let thread_count = 8;
    let operations_per_thread = 100;
    let barrier = Arc::new(Barrier::new(thread_count));

    let handles: Vec<_> = (0..thread_count)
        .map(|thread_id| {
            let container = Arc::clone(&container);
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || {
                barrier.wait(); // Synchronize start

                let counter = container.get_required::<CounterService>();
                let shared = container.get_required::<SharedResource>();

                for i in 0..operations_per_thread {
                    counter.increment();
                    shared.add_entry(format!("thread-{}-op-{}", thread_id, i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let counter = container.get_required::<CounterService>();
    let shared = container.get_required::<SharedResource>();
    assert_eq!(counter.get_count(), (thread_count * operations_per_thread) as u32);
    assert_eq!(shared.len(), thread_count * operations_per_thread);
}

#[test]
fn test_factories_build_fresh_values_per_thread() {
    static NEXT_ID: AtomicU32 = AtomicU32::new(0);

    let container = Container::new()
        .register_instance(CounterService::new())
        .register_factory(|r| Worker {
            id: NEXT_ID.fetch_add(1, Ordering::SeqCst),
            counter: r.get_required::<CounterService>(),
        });
    let thread_count = 10;
    let per_thread = 5;

    let mut ids: Vec<u32> = crossbeam_utils::thread::scope(|s| {
        let handles: Vec<_> = (0..thread_count)
            .map(|_| {
                let container = &container;
                s.spawn(move |_| {
                    (0..per_thread)
                        .map(|_| {
                            let worker = container.get_required::<Worker>();
                            worker.counter.increment();
                            worker.id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    })
    .unwrap();

    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), thread_count * per_thread);
    assert_eq!(
        container.get_required::<CounterService>().get_count(),
        (thread_count * per_thread) as u32
    );
}

#[test]
fn test_cached_factory_constructs_once_under_contention() {
    let constructions = Arc::new(AtomicU32::new(0));
    let constructions_clone = constructions.clone();

    let container = Container::new().register_cached(move |_| {
        constructions_clone.fetch_add(1, Ordering::SeqCst);
        // Widen the race window
        thread::sleep(Duration::from_millis(10));
        SharedResource::new()
    });
    let thread_count = 16;
    let barrier = Barrier::new(thread_count);

    let resolved: Vec<Arc<SharedResource>> = crossbeam_utils::thread::scope(|s| {
        let handles: Vec<_> = (0..thread_count)
            .map(|_| {
                s.spawn(|_| {
                    barrier.wait();
                    container.get_required::<SharedResource>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    assert_eq!(constructions.load(Ordering::SeqCst), 1);
    for service in &resolved[1..] {
        assert!(Arc::ptr_eq(&resolved[0], service));
    }
}

#[test]
fn test_concurrent_resolution_is_not_a_cycle() {
    // The same identity resolved on many threads at once must not look like
    // re-entry; the resolution stack is per thread.
    struct Slow;
    struct Outer(Arc<Slow>);

    let container = Container::new()
        .register_factory(|_| {
            thread::sleep(Duration::from_millis(5));
            Slow
        })
        .register_fallible(|r| Ok(Outer(r.get::<Slow>()?)));
    let thread_count = 8;
    let barrier = Barrier::new(thread_count);

    let results: Vec<Result<(), DiError>> = crossbeam_utils::thread::scope(|s| {
        let handles: Vec<_> = (0..thread_count)
            .map(|_| {
                s.spawn(|_| {
                    barrier.wait();
                    container.get::<Outer>().map(|_| ())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    assert!(results.iter().all(Result::is_ok));
}

#[test]
fn test_registration_while_other_threads_resolve() {
    let base = Container::new().register_instance(CounterService::new());

    crossbeam_utils::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|_| {
                for _ in 0..100 {
                    base.get_required::<CounterService>().increment();
                }
            });
        }

        // Deriving new containers never affects the one being resolved
        for i in 0..50u32 {
            let derived = base.register_instance(i);
            assert_eq!(*derived.get_required::<u32>(), i);
            assert!(!base.contains::<u32>());
        }
    })
    .unwrap();

    assert_eq!(base.get_required::<CounterService>().get_count(), 400);
    assert_eq!(base.len(), 1);
}

#[test]
fn test_container_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Container>();
    assert_send_sync::<strand_di::Deferred<CounterService>>();
}
