//! Example: Render the preset sparkle page offscreen.
//!
//! Builds three canvases, animates every field for a few seconds of frames,
//! resizes the hero canvas halfway through, and writes each field's last
//! frame as a PNG.
//!
//! Run with:
//!     cargo run --example render_sparkle [fields.json]

use anyhow::Context;
use sparkle_field::fields::{ACCESS_CANVAS, COLUMN_CANVAS, HERO_CANVAS};
use sparkle_field::{
    load_field_configs, sparkle_presets, CanvasSurface, FieldFactory, FrameCount, GpuBackend,
    SceneLoop, SceneRegistry, SurfaceMap,
};
use std::path::PathBuf;
use std::sync::Arc;

const FRAMES: u64 = 120;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Sparkle Field - Offscreen Page Example");
    println!("======================================\n");

    let configs = match std::env::args().nth(1) {
        Some(path) => load_field_configs(&path).with_context(|| format!("loading {}", path))?,
        None => sparkle_presets(),
    };
    println!("Fields configured: {}", configs.len());

    let hero = Arc::new(CanvasSurface::with_pixel_ratio(640, 360, 2.0));
    let surfaces = SurfaceMap::new()
        .with(HERO_CANVAS, hero.clone())
        .with(COLUMN_CANVAS, Arc::new(CanvasSurface::new(320, 480)))
        .with(ACCESS_CANVAS, Arc::new(CanvasSurface::new(480, 240)));

    let backend = pollster::block_on(GpuBackend::create()).context("initializing GPU")?;
    println!("  GPU: {}\n", backend.context().adapter_info().name);

    let factory = FieldFactory::new(&backend);
    let mut scene = SceneLoop::new(SceneRegistry::build(&configs, &surfaces, &factory));
    if scene.registry().is_empty() {
        println!("No configured surface exists on this page, nothing to render.");
        return Ok(());
    }
    let resize = scene.resize_signal();

    println!("Rendering {} frames...", FRAMES);
    scene.run(&mut FrameCount::new(FRAMES / 2));
    hero.resize(800, 300);
    resize.notify();
    scene.run(&mut FrameCount::new(FRAMES - FRAMES / 2));

    let out_dir = PathBuf::from("sparkle_output");
    std::fs::create_dir_all(&out_dir)?;

    for field in scene.registry().fields() {
        let viewport = field.renderer().viewport();
        let Some(pixels) = field.capture() else {
            println!("  {}: no readback available", field.id());
            continue;
        };
        let image = image::RgbaImage::from_raw(viewport.width, viewport.height, pixels)
            .context("capture size does not match viewport")?;
        let path = out_dir.join(format!("{}.png", field.id()));
        image.save(&path)?;
        println!(
            "  {} ({}x{}, {} particles) -> {}",
            field.id(),
            viewport.width,
            viewport.height,
            field.buffers().len(),
            path.display()
        );
    }

    println!("\nDone! {} frames rendered.", scene.frames());
    Ok(())
}
