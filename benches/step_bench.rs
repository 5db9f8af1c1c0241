//! Benchmarks for particle animation steps.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sparkle_field::particles;
use sparkle_field::{sparkle_presets, ParticleBuffers};

fn bench_preset_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("Preset Steps");

    for config in sparkle_presets() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut buffers = ParticleBuffers::spawn(&config, &mut rng);

        group.bench_function(BenchmarkId::new(config.animation_style.name(), &config.surface_id), |b| {
            b.iter(|| {
                particles::step(black_box(&mut buffers), &mut rng);
            });
        });
    }

    group.finish();
}

fn bench_particle_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("Particle Count Scaling");

    for count in [100u32, 1_000, 10_000] {
        for mut config in sparkle_presets().into_iter().take(2) {
            config.particle_count = count;
            let mut rng = StdRng::seed_from_u64(1);
            let mut buffers = ParticleBuffers::spawn(&config, &mut rng);

            group.bench_with_input(
                BenchmarkId::new(config.animation_style.name(), count),
                &count,
                |b, _| {
                    b.iter(|| {
                        particles::step(black_box(&mut buffers), &mut rng);
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_preset_steps, bench_particle_counts);
criterion_main!(benches);
