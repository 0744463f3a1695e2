use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use zipdist::{CacheConfig, MappingStore, Resolver};

fn bench_hot_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("hot_hit");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("resolve_warmed_member", |b| {
        let resolver = Resolver::from_embedded().unwrap();
        resolver.warm_hot_members();

        b.iter(|| {
            black_box(resolver.resolve_primary("90210").unwrap());
        });
    });

    group.finish();
}

fn bench_runtime_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("runtime_hit");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("resolve_resident_zip", |b| {
        let resolver = Resolver::from_embedded().unwrap();
        let zips: Vec<String> = resolver
            .store()
            .iter()
            .take(64)
            .map(|(zip, _)| zip.to_string())
            .collect();

        // Pull every ZIP through the cold path once
        for zip in &zips {
            resolver.resolve_primary(zip).unwrap();
        }

        let mut counter = 0;
        b.iter(|| {
            black_box(resolver.resolve_primary(&zips[counter % zips.len()]).unwrap());
            counter += 1;
        });
    });

    group.finish();
}

fn bench_cold_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("cold_lookup");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("resolve_store_fallthrough", |b| {
        // Capacity of one with two alternating ZIPs: every lookup evicts
        // the other, so the walk always falls through to the store
        let config = CacheConfig {
            hot_zips: Vec::new(),
            runtime_capacity: 1,
        };
        let resolver = Resolver::new(MappingStore::load().unwrap(), config);
        let zips = ["48201", "90210"];

        let mut counter = 0;
        b.iter(|| {
            black_box(resolver.resolve_primary(zips[counter % 2]).unwrap());
            counter += 1;
        });
    });

    group.finish();
}

fn bench_state_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_lookup");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("resolve_state_prefix_range", |b| {
        let resolver = Resolver::from_embedded().unwrap();

        b.iter(|| {
            black_box(resolver.resolve_state("48201").unwrap());
        });
    });

    group.finish();
}

fn bench_invalid_input(c: &mut Criterion) {
    let mut group = c.benchmark_group("invalid_input");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("reject_malformed_zip", |b| {
        let resolver = Resolver::from_embedded().unwrap();

        b.iter(|| {
            black_box(resolver.resolve_primary("4820A").unwrap_err());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_hot_hit,
    bench_runtime_hit,
    bench_cold_lookup,
    bench_state_lookup,
    bench_invalid_input
);
criterion_main!(benches);
