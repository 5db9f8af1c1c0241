//! Building live fields from configurations.

use crate::camera::{aspect_ratio, PerspectiveCamera};
use crate::fields::ParticleFieldConfig;
use crate::particles::{self, ParticleBuffers};
use crate::render::{FieldRenderer, RenderBackend};
use crate::surface::{RenderSurface, SurfaceLookup, Viewport};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// A field bound to its surface: camera, renderer and particle state.
pub struct LiveField {
    config: ParticleFieldConfig,
    surface: Arc<dyn RenderSurface>,
    camera: PerspectiveCamera,
    buffers: ParticleBuffers,
    renderer: Box<dyn FieldRenderer>,
    rng: StdRng,
}

impl LiveField {
    pub fn id(&self) -> &str {
        &self.config.surface_id
    }

    pub fn config(&self) -> &ParticleFieldConfig {
        &self.config
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn buffers(&self) -> &ParticleBuffers {
        &self.buffers
    }

    pub fn renderer(&self) -> &dyn FieldRenderer {
        self.renderer.as_ref()
    }

    /// Advance the particles by one tick without drawing.
    pub fn step(&mut self) {
        particles::step(&mut self.buffers, &mut self.rng);
    }

    /// Draw the current particle state.
    pub fn render(&mut self) {
        self.renderer.draw(&self.camera, &self.buffers);
    }

    /// One frame: step, then draw.
    pub fn tick(&mut self) {
        self.step();
        self.render();
    }

    /// Re-read the surface's content box and update camera and render target.
    ///
    /// Particle state is left untouched.
    pub fn resize(&mut self) {
        let (width, height) = self.surface.content_size();
        self.camera.set_aspect(aspect_ratio(width, height));
        let viewport = Viewport::of(self.surface.as_ref());
        log::debug!(
            "Resized field '{}' to {}x{} ({}x{} px)",
            self.config.surface_id,
            width,
            height,
            viewport.width,
            viewport.height
        );
        self.renderer.resize(viewport);
    }

    /// RGBA bytes of the last drawn frame, when the renderer supports readback.
    pub fn capture(&self) -> Option<Vec<u8>> {
        self.renderer.capture()
    }
}

/// Per-field seed: the factory seed mixed with an FNV-1a hash of the surface id,
/// so identically configured fields on different surfaces sample independently.
fn field_seed(seed: u64, surface_id: &str) -> u64 {
    let hash = surface_id
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |h, b| (h ^ b as u64).wrapping_mul(0x0100_0000_01b3));
    seed ^ hash
}

/// Turns [`ParticleFieldConfig`]s into [`LiveField`]s on a render backend.
pub struct FieldFactory<'a> {
    backend: &'a dyn RenderBackend,
    seed: Option<u64>,
}

impl<'a> FieldFactory<'a> {
    pub fn new(backend: &'a dyn RenderBackend) -> Self {
        Self { backend, seed: None }
    }

    /// Seed every field's random source, for reproducible layouts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build a field if its surface exists.
    ///
    /// Returns `None` when the surface is absent or the config is malformed;
    /// neither case is an error for decorative rendering.
    pub fn create(&self, config: &ParticleFieldConfig, surfaces: &dyn SurfaceLookup) -> Option<LiveField> {
        let Some(surface) = surfaces.surface(&config.surface_id) else {
            log::debug!("Surface '{}' not found, skipping field", config.surface_id);
            return None;
        };

        if let Err(e) = config.validate() {
            log::error!("Skipping field '{}': {}", config.surface_id, e);
            return None;
        }

        let (width, height) = surface.content_size();
        let camera = PerspectiveCamera::for_size(width, height);
        let viewport = Viewport::of(surface.as_ref());

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(field_seed(seed, &config.surface_id)),
            None => StdRng::from_entropy(),
        };
        let buffers = ParticleBuffers::spawn(config, &mut rng);
        let renderer = self.backend.create_renderer(config, viewport);

        log::debug!(
            "Created {} field '{}' with {} particles at {}x{} px",
            config.animation_style.name(),
            config.surface_id,
            buffers.len(),
            viewport.width,
            viewport.height
        );

        Some(LiveField {
            config: config.clone(),
            surface,
            camera,
            buffers,
            renderer,
            rng,
        })
    }
}
