//! Rendering seam between the simulation and the GPU.
//!
//! A [`RenderBackend`] builds one [`FieldRenderer`] per live field. The wgpu
//! implementation lives in [`crate::gpu::GpuBackend`].

use crate::camera::PerspectiveCamera;
use crate::fields::ParticleFieldConfig;
use crate::particles::ParticleBuffers;
use crate::surface::Viewport;

/// Draws one field into its own render target.
pub trait FieldRenderer {
    /// Current render target size.
    fn viewport(&self) -> Viewport;

    /// Reallocate the render target for a new size.
    fn resize(&mut self, viewport: Viewport);

    /// Upload the current particle state and issue one draw call.
    fn draw(&mut self, camera: &PerspectiveCamera, particles: &ParticleBuffers);

    /// Tightly packed RGBA bytes of the last drawn frame, if the renderer keeps one.
    fn capture(&self) -> Option<Vec<u8>> {
        None
    }
}

/// Creates renderers for newly built fields.
pub trait RenderBackend {
    fn create_renderer(&self, config: &ParticleFieldConfig, viewport: Viewport) -> Box<dyn FieldRenderer>;
}
