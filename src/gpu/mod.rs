//! GPU rendering using wgpu.
//!
//! Each live field renders its particles as instanced point sprites into
//! its own transparent offscreen texture, one draw call per frame.

pub mod context;
pub mod layouts;
pub mod pipelines;
pub mod renderer;
pub mod shading;

pub use context::{GpuContext, GpuError};
pub use renderer::{particle_vertex_layout, GpuBackend, GpuFieldRenderer, TARGET_FORMAT};
pub use shading::{point_size, PARTICLE_SHADER, POINT_SCALE};
