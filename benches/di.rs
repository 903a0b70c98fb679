use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use strand_di::*;
use std::sync::Arc;

// Distinct identity per N, for registry size benchmarks
struct Slot<const N: usize>(u64);

macro_rules! register_slots {
    ($container:expr; $($n:literal)*) => {{
        let mut container = $container;
        $(container = container.register_instance(Slot::<$n>($n));)*
        container
    }};
}

// ===== Micro Benchmarks =====

fn bench_instance_hit(c: &mut Criterion) {
    let container = Container::new().register_instance(42u64);

    c.bench_function("instance_hit_u64", |b| {
        b.iter(|| {
            let v = container.get::<u64>().unwrap();
            black_box(v);
        })
    });
}

fn bench_factory_vs_cached(c: &mut Criterion) {
    #[derive(Clone)]
    struct Service {
        data: [u8; 64],
    }

    let mut group = c.benchmark_group("factory_vs_cached");

    let per_call = Container::new().register_factory(|_| Service { data: [0; 64] });
    group.bench_function("factory", |b| {
        b.iter(|| {
            let v = per_call.get::<Service>().unwrap();
            black_box(v.data[0]);
        })
    });

    let cached = Container::new().register_cached(|_| Service { data: [0; 64] });
    let _ = cached.get::<Service>().unwrap();
    group.bench_function("cached", |b| {
        b.iter(|| {
            let v = cached.get::<Service>().unwrap();
            black_box(v.data[0]);
        })
    });

    group.finish();
}

fn bench_concrete_vs_trait(c: &mut Criterion) {
    trait Speaker: Send + Sync {
        fn speak(&self) -> u64;
    }

    struct Dog;
    impl Speaker for Dog {
        fn speak(&self) -> u64 {
            1
        }
    }

    let mut group = c.benchmark_group("concrete_vs_trait");
    let container = Container::new()
        .register_instance(Dog)
        .register_instance(Arc::new(Dog) as Arc<dyn Speaker>);

    group.bench_function("concrete", |b| {
        b.iter(|| {
            let v = container.get::<Dog>().unwrap();
            black_box(v.speak());
        })
    });

    group.bench_function("trait_handle", |b| {
        b.iter(|| {
            let v = container.get::<Arc<dyn Speaker>>().unwrap();
            black_box(v.speak());
        })
    });

    group.finish();
}

fn bench_deferred(c: &mut Criterion) {
    let container = Container::new().register_factory(|_| vec![0u8; 16]);
    let producer = container.factory_for::<Vec<u8>>();

    c.bench_function("deferred_invoke", |b| {
        b.iter(|| {
            let v = producer.try_get().unwrap();
            black_box(v.len());
        })
    });
}

fn bench_chain_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("circular_detection");

    // Non-circular chain of depth 8
    struct Service1;
    struct Service2 { _s1: Arc<Service1> }
    struct Service3 { _s2: Arc<Service2> }
    struct Service4 { _s3: Arc<Service3> }
    struct Service5 { _s4: Arc<Service4> }
    struct Service6 { _s5: Arc<Service5> }
    struct Service7 { _s6: Arc<Service6> }
    struct Service8 { _s7: Arc<Service7> }

    let build = |options: ContainerOptions| {
        Container::with_options(options)
            .register_instance(Service1)
            .register_factory(|r| Service2 { _s1: r.get_required() })
            .register_factory(|r| Service3 { _s2: r.get_required() })
            .register_factory(|r| Service4 { _s3: r.get_required() })
            .register_factory(|r| Service5 { _s4: r.get_required() })
            .register_factory(|r| Service6 { _s5: r.get_required() })
            .register_factory(|r| Service7 { _s6: r.get_required() })
            .register_factory(|r| Service8 { _s7: r.get_required() })
    };

    let checked = build(ContainerOptions::default());
    group.bench_function("chain_depth_8", |b| {
        b.iter(|| {
            let service = checked.get::<Service8>().unwrap();
            black_box(&service);
        })
    });

    let unchecked = build(ContainerOptions::new().with_cycle_detection(false));
    group.bench_function("chain_depth_8_unchecked", |b| {
        b.iter(|| {
            let service = unchecked.get::<Service8>().unwrap();
            black_box(&service);
        })
    });

    group.finish();
}

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");

    let container = Container::new().register_instance(42u64);

    for &thread_count in &[1, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("instance_threads", thread_count),
            &thread_count,
            |b, &threads| {
                b.iter_custom(|iters| {
                    let start = std::time::Instant::now();
                    crossbeam_utils::thread::scope(|s| {
                        for _ in 0..threads {
                            let container_ref = &container;
                            s.spawn(move |_| {
                                for _ in 0..iters / threads as u64 {
                                    let v = container_ref.get::<u64>().unwrap();
                                    black_box(v);
                                }
                            });
                        }
                    }).unwrap();
                    start.elapsed()
                })
            },
        );
    }

    group.finish();
}

// ===== Macro Benchmarks =====

fn bench_large_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_registry");

    group.bench_function("register_32", |b| {
        b.iter(|| {
            let container = register_slots!(Container::new();
                0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15
                16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31);
            black_box(container.len());
        })
    });

    let container = register_slots!(Container::new();
        0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15
        16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31);

    group.bench_function("resolve_first", |b| {
        b.iter(|| black_box(container.get::<Slot<0>>().unwrap().0))
    });
    group.bench_function("resolve_last", |b| {
        b.iter(|| black_box(container.get::<Slot<31>>().unwrap().0))
    });
    group.bench_function("miss", |b| {
        b.iter(|| black_box(container.get::<Slot<99>>().is_err()))
    });

    group.finish();
}

criterion_group!(
    micro_benches,
    bench_instance_hit,
    bench_factory_vs_cached,
    bench_concrete_vs_trait,
    bench_deferred,
    bench_chain_depth,
    bench_contention
);

criterion_group!(macro_benches, bench_large_registry);

criterion_main!(micro_benches, macro_benches);
