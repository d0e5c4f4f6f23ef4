use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dedekind::{AntiChain, AntiChainInterval, SmallSet};

fn full_lattice(n: u8) -> AntiChainInterval {
    let u = SmallSet::universe(n).unwrap();
    AntiChainInterval::closed(AntiChain::empty(u), AntiChain::universe_function(u))
}

fn bench_general_iterator(c: &mut Criterion) {
    c.bench_function("interval_iter_n4", |b| {
        b.iter(|| black_box(full_lattice(4).iter().count()))
    });
}

fn bench_fast_iterator(c: &mut Criterion) {
    c.bench_function("interval_fast_iter_n4", |b| {
        b.iter(|| black_box(full_lattice(4).fast_iter().count()))
    });

    c.bench_function("interval_fast_iter_n5", |b| {
        b.iter(|| black_box(full_lattice(5).fast_iter().count()))
    });
}

fn bench_size(c: &mut Criterion) {
    c.bench_function("interval_size_n5", |b| {
        b.iter(|| black_box(full_lattice(5).size()))
    });

    c.bench_function("interval_size_n6", |b| {
        b.iter(|| black_box(full_lattice(6).size()))
    });
}

criterion_group!(
    benches,
    bench_general_iterator,
    bench_fast_iterator,
    bench_size
);
criterion_main!(benches);
