use criterion::{black_box, criterion_group, criterion_main, Criterion};
use persimmon_vector::Vector;

pub fn against_rpds(c: &mut Criterion) {
    let mut group = c.benchmark_group("rpds comparison");

    group.bench_function("persimmon push 10k", |b| {
        b.iter(|| {
            let mut vec: Vector<u32, 32> = Vector::new();
            for i in 0..10_000 {
                vec.push(i);
            }
            black_box(vec.len())
        });
    });

    group.bench_function("rpds push 10k", |b| {
        b.iter(|| {
            let mut vec = rpds::Vector::new();
            for i in 0..10_000u32 {
                vec.push_back_mut(i);
            }
            black_box(vec.len())
        });
    });

    let ours: Vector<u32, 32> = (0..10_000).collect();
    let theirs: rpds::Vector<u32> = (0..10_000u32).collect();

    group.bench_function("persimmon iter 10k", |b| {
        b.iter(|| black_box(ours.iter().count()));
    });

    group.bench_function("rpds iter 10k", |b| {
        b.iter(|| black_box(theirs.iter().count()));
    });
}

criterion_group!(benches, against_rpds);
criterion_main!(benches);
