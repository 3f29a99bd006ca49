use criterion::{black_box, criterion_group, criterion_main, Criterion};
use persimmon_pennant::Pennant;

pub fn insert_and_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert and drain");

    group.bench_function("insert 10k", |b| {
        b.iter(|| {
            let mut queue: Pennant<u32, u32> = Pennant::new();
            for i in 0..10_000 {
                queue.insert(i, i.wrapping_mul(2_654_435_761));
            }
            black_box(queue.len())
        });
    });

    group.bench_function("from_sorted 10k", |b| {
        let pairs: Vec<(u32, u32)> = (0..10_000)
            .map(|i: u32| (i, i.wrapping_mul(2_654_435_761)))
            .collect();
        b.iter(|| black_box(Pennant::from_sorted(pairs.clone()).unwrap().len()));
    });

    group.bench_function("heapsort 10k", |b| {
        let queue: Pennant<u32, u32> = (0..10_000)
            .map(|i: u32| (i, i.wrapping_mul(2_654_435_761)))
            .collect();
        b.iter(|| {
            let mut queue = queue.clone();
            let mut count = 0;
            while queue.pop_min().is_some() {
                count += 1;
            }
            black_box(count)
        });
    });
}

pub fn lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    let queue: Pennant<u32, u32> = (0..10_000)
        .map(|i: u32| (i, i.wrapping_mul(2_654_435_761)))
        .collect();

    group.bench_function("get 10k out of 10k", |b| {
        b.iter(|| {
            let mut hits = 0;
            for i in 0..10_000 {
                if queue.get(&i).is_some() {
                    hits += 1;
                }
            }
            black_box(hits)
        });
    });

    group.bench_function("iter_ordered 10k", |b| {
        b.iter(|| black_box(queue.iter_ordered().count()));
    });
}

criterion_group!(benches, insert_and_drain, lookup);
criterion_main!(benches);
