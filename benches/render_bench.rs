//! Benchmarks for GPU field rendering.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sparkle_field::{
    sparkle_presets, FieldRenderer, GpuBackend, ParticleBuffers, PerspectiveCamera, Viewport,
};

fn bench_render_presets(c: &mut Criterion) {
    let mut group = c.benchmark_group("GPU Rendering");

    let backend = match pollster::block_on(GpuBackend::create()) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Skipping GPU benchmarks: {}", e);
            return;
        }
    };

    let viewport = Viewport { width: 1920, height: 1080 };
    let camera = PerspectiveCamera::for_size(viewport.width, viewport.height);

    for config in sparkle_presets().into_iter().take(2) {
        let mut rng = StdRng::seed_from_u64(0);
        let buffers = ParticleBuffers::spawn(&config, &mut rng);
        let mut renderer = backend.create_gpu_renderer(&config, viewport);

        group.bench_function(BenchmarkId::new("draw_1080p", config.animation_style.name()), |b| {
            b.iter(|| {
                renderer.draw(black_box(&camera), black_box(&buffers));
            });
        });
    }

    group.finish();
}

fn bench_render_resolutions(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resolution Scaling");

    let backend = match pollster::block_on(GpuBackend::create()) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Skipping GPU benchmarks: {}", e);
            return;
        }
    };

    let resolutions = [
        (640, 360, "360p"),
        (1280, 720, "720p"),
        (1920, 1080, "1080p"),
    ];

    let config = &sparkle_presets()[0];
    let mut rng = StdRng::seed_from_u64(0);
    let buffers = ParticleBuffers::spawn(config, &mut rng);

    for (width, height, name) in resolutions {
        let viewport = Viewport { width, height };
        let camera = PerspectiveCamera::for_size(width, height);
        let mut renderer = backend.create_gpu_renderer(config, viewport);

        group.bench_with_input(BenchmarkId::new("draw_and_capture", name), &name, |b, _| {
            b.iter(|| {
                renderer.draw(&camera, &buffers);
                black_box(renderer.capture());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_render_presets, bench_render_resolutions);
criterion_main!(benches);
