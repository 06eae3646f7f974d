use atlas_packer_core::prelude::*;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use std::hint::black_box;

fn generate_sprites(count: usize, min_size: u32, max_size: u32) -> Vec<(String, u32, u32)> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    (0..count)
        .map(|i| {
            let w = rng.gen_range(min_size..=max_size);
            let h = rng.gen_range(min_size..=max_size);
            (format!("sprite_{}", i), w, h)
        })
        .collect()
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategies");

    for count in [50, 200, 800] {
        let sprites = generate_sprites(count, 8, 64);
        group.throughput(Throughput::Elements(count as u64));

        for (name, strategy) in [("Shelf", Strategy::Shelf), ("Skyline", Strategy::Skyline)] {
            for allow_rotation in [false, true] {
                let cfg = PackerConfig::builder()
                    .with_max_dimensions(4096, 4096)
                    .allow_rotation(allow_rotation)
                    .strategy(strategy)
                    .build();
                let id = if allow_rotation {
                    format!("{name}_rot")
                } else {
                    name.to_string()
                };
                group.bench_with_input(BenchmarkId::new(id, count), &sprites, |b, sprites| {
                    b.iter(|| black_box(pack_layout(sprites.clone(), cfg.clone())))
                });
            }
        }
    }
    group.finish();
}

fn bench_optimal_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimal_size");
    group.sample_size(20);
    let sprites = generate_sprites(200, 8, 64);

    for strategy in [Strategy::Shelf, Strategy::Skyline] {
        let cfg = PackerConfig::builder()
            .with_max_dimensions(2048, 2048)
            .strategy(strategy)
            .find_optimal_size(true)
            .build();
        group.bench_with_input(
            BenchmarkId::new(format!("{strategy:?}"), sprites.len()),
            &sprites,
            |b, sprites| b.iter(|| black_box(pack_layout(sprites.clone(), cfg.clone()))),
        );
    }
    group.finish();
}

fn bench_print_occupancy(_c: &mut Criterion) {
    let sprites = generate_sprites(200, 8, 64);
    for strategy in [Strategy::Shelf, Strategy::Skyline] {
        let cfg = PackerConfig::builder().strategy(strategy).build();
        if let Ok(res) = pack_layout(sprites.clone(), cfg) {
            println!("{:?}: {}x{} {}", strategy, res.width, res.height, res.stats().summary());
        }
    }
}

criterion_group!(benches, bench_strategies, bench_optimal_size, bench_print_occupancy);
criterion_main!(benches);
