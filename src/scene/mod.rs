//! Scene assembly: field creation, the registry of live fields, and the frame loop.
//!
//! This module provides:
//! - [`FieldFactory`] building [`LiveField`]s for configs whose surface exists
//! - [`SceneRegistry`] owning live fields in registration order
//! - [`SceneLoop`] driving one step and draw per field on every frame

mod factory;
mod frame_loop;

pub use factory::{FieldFactory, LiveField};
pub use frame_loop::{FrameClock, FrameCount, IntervalClock, ResizeSignal, SceneLoop};

use crate::fields::ParticleFieldConfig;
use crate::surface::SurfaceLookup;

/// All live fields on the page, in registration order.
#[derive(Default)]
pub struct SceneRegistry {
    fields: Vec<LiveField>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a field for every config whose surface resolves.
    pub fn build(
        configs: &[ParticleFieldConfig],
        surfaces: &dyn SurfaceLookup,
        factory: &FieldFactory<'_>,
    ) -> Self {
        let mut registry = Self::new();
        for config in configs {
            if let Some(field) = factory.create(config, surfaces) {
                registry.register(field);
            }
        }
        log::info!("Started {} of {} particle fields", registry.len(), configs.len());
        registry
    }

    pub fn register(&mut self, field: LiveField) {
        self.fields.push(field);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[LiveField] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&LiveField> {
        self.fields.iter().find(|f| f.id() == id)
    }

    /// Step and draw every field once.
    pub fn tick(&mut self) {
        for field in &mut self.fields {
            field.tick();
        }
    }

    /// Recompute every field's camera aspect and render target size.
    pub fn resize(&mut self) {
        for field in &mut self.fields {
            field.resize();
        }
    }
}
