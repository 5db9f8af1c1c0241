//! GPU integration tests. Each test returns early when no adapter is available.

use sparkle_field::fields::{ACCESS_CANVAS, COLUMN_CANVAS, HERO_CANVAS};
use sparkle_field::{
    sparkle_presets, CanvasSurface, FieldFactory, FrameCount, GpuBackend, SceneLoop, SceneRegistry,
    SurfaceMap, Viewport,
};
use std::sync::Arc;

async fn backend() -> Option<GpuBackend> {
    GpuBackend::create().await.ok()
}

fn coverage(pixels: &[u8]) -> usize {
    pixels.chunks_exact(4).filter(|p| p[3] > 0).count()
}

#[tokio::test]
async fn test_preset_page_renders_every_field() {
    let Some(backend) = backend().await else {
        return; // Skip if no GPU
    };

    let surfaces = SurfaceMap::new()
        .with(HERO_CANVAS, Arc::new(CanvasSurface::new(320, 180)))
        .with(COLUMN_CANVAS, Arc::new(CanvasSurface::new(160, 320)))
        .with(ACCESS_CANVAS, Arc::new(CanvasSurface::with_pixel_ratio(200, 100, 3.0)));
    let factory = FieldFactory::new(&backend).with_seed(12);

    let mut scene = SceneLoop::new(SceneRegistry::build(&sparkle_presets(), &surfaces, &factory));
    assert_eq!(scene.registry().len(), 3);
    assert_eq!(scene.run(&mut FrameCount::new(60)), 60);

    for field in scene.registry().fields() {
        let viewport = field.renderer().viewport();
        let Some(pixels) = field.capture() else {
            continue;
        };
        assert_eq!(pixels.len(), (viewport.width * viewport.height * 4) as usize);
        assert!(coverage(&pixels) > 0, "field '{}' drew nothing", field.id());
    }

    // Pixel ratio 3 is capped at 2.
    let access = scene.registry().field(ACCESS_CANVAS).unwrap();
    assert_eq!(access.renderer().viewport(), Viewport { width: 400, height: 200 });
}

#[tokio::test]
async fn test_resized_field_keeps_rendering() {
    let Some(backend) = backend().await else {
        return;
    };

    let canvas = Arc::new(CanvasSurface::new(256, 256));
    let surfaces = SurfaceMap::new().with(HERO_CANVAS, canvas.clone());
    let factory = FieldFactory::new(&backend).with_seed(3);
    let mut scene = SceneLoop::new(SceneRegistry::build(&sparkle_presets(), &surfaces, &factory));
    let signal = scene.resize_signal();

    scene.frame();
    canvas.resize(128, 64);
    signal.notify();
    scene.frame();

    let field = scene.registry().field(HERO_CANVAS).unwrap();
    assert!((field.camera().aspect - 2.0).abs() < 1e-6);
    if let Some(pixels) = field.capture() {
        assert_eq!(pixels.len(), 128 * 64 * 4);
    }
}
