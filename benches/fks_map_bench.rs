use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fks_map::FksMap;

fn pairs_with_size(size: usize) -> Vec<(u64, u64)> {
    (0..size as u64)
        .map(|i| (i.wrapping_mul(0x9e3779b97f4a7c15), i))
        .collect()
}

fn bench_lookup_performance(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_performance");

    for size in [100, 1000, 10000].iter() {
        let map = FksMap::new(pairs_with_size(*size)).unwrap();
        let all_keys: Vec<u64> = map.keys().copied().collect();
        let test_key = all_keys[0];

        group.bench_with_input(BenchmarkId::new("checked", size), size, |b, _| {
            b.iter(|| black_box(map.get(black_box(&test_key)).unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("unchecked", size), size, |b, _| {
            // SAFETY: test_key was part of the construction input.
            b.iter(|| black_box(unsafe { map.get_unchecked(black_box(&test_key)) }))
        });

        group.bench_with_input(BenchmarkId::new("rotating_keys", size), size, |b, _| {
            let mut key_idx = 0;
            b.iter(|| {
                let key = &all_keys[key_idx % all_keys.len()];
                key_idx = key_idx.wrapping_add(1);
                black_box(map.get(black_box(key)).unwrap())
            })
        });

        group.bench_with_input(BenchmarkId::new("missing_key", size), size, |b, _| {
            b.iter(|| black_box(map.get(black_box(&1)).is_err()))
        });
    }

    group.finish();
}

fn bench_construction_performance(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction_performance");

    for size in [100, 1000, 10000].iter() {
        let pairs = pairs_with_size(*size);

        group.bench_with_input(BenchmarkId::new("construction", size), &pairs, |b, pairs| {
            b.iter(|| black_box(FksMap::new(black_box(pairs.clone())).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lookup_performance, bench_construction_performance);
criterion_main!(benches);
