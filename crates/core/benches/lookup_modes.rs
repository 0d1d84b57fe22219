use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use geo::polygon;
use hexdex::{HexIndex, LookupStrategy, Resolution};
use std::hint::black_box;

const STRATEGIES: [(&str, LookupStrategy); 2] = [
    ("cached", LookupStrategy::Cached),
    ("recompute", LookupStrategy::Recompute),
];

fn build(lookup: LookupStrategy) -> HexIndex {
    HexIndex::builder()
        .base_resolution(10)
        .center(56.0, 38.0)
        .radius_km(7.0)
        .lookup(lookup)
        .seed(1)
        .build()
        .unwrap()
}

fn bench_children_of(c: &mut Criterion) {
    let mut group = c.benchmark_group("children_of");

    for (name, strategy) in STRATEGIES {
        let index = build(strategy);
        let parent = index.center().parent(Resolution::Eight).unwrap();

        group.bench_with_input(BenchmarkId::new(name, "res8"), &parent, |b, parent| {
            b.iter(|| black_box(index.children_of(*parent).unwrap()));
        });
    }

    group.finish();
}

fn bench_within(c: &mut Criterion) {
    let mut group = c.benchmark_group("within");
    let area = polygon![
        (x: 37.98, y: 55.99),
        (x: 38.02, y: 55.99),
        (x: 38.02, y: 56.01),
        (x: 37.98, y: 56.01),
    ];

    for (name, strategy) in STRATEGIES {
        let index = build(strategy);
        group.bench_function(name, |b| {
            b.iter(|| black_box(index.within(&area).unwrap()));
        });
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    group.sample_size(20);

    for (name, strategy) in STRATEGIES {
        let index = build(strategy);
        group.bench_function(name, |b| {
            b.iter(|| black_box(index.aggregate(Resolution::Six).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_children_of, bench_within, bench_aggregate);
criterion_main!(benches);
