//! Sparkle Field
//!
//! Decorative, continuously animated particle fields rendered with wgpu.
//!
//! # Features
//!
//! - Declarative field configs with built-in presets and JSON loading via serde
//! - Rising sparkles that wrap at the top of the volume
//! - Expanding flares that fade in, then grow while fading out
//! - Soft disc and flare sprite shading, normal or additive blending
//! - Several independent fields per page, each on its own surface
//! - Resize handling that never touches particle state
//!
//! # Example
//!
//! ```no_run
//! use sparkle_field::{sparkle_presets, FieldFactory, FrameCount, GpuBackend, SceneLoop, SceneRegistry};
//! use sparkle_field::surface::{CanvasSurface, SurfaceMap};
//! use std::sync::Arc;
//!
//! let backend = pollster::block_on(GpuBackend::create())?;
//! let surfaces = SurfaceMap::new().with("hero-canvas", Arc::new(CanvasSurface::new(1280, 720)));
//! let registry = SceneRegistry::build(&sparkle_presets(), &surfaces, &FieldFactory::new(&backend));
//!
//! let mut scene = SceneLoop::new(registry);
//! scene.run(&mut FrameCount::new(60));
//! # Ok::<(), sparkle_field::GpuError>(())
//! ```

pub mod camera;
pub mod fields;
pub mod gpu;
pub mod particles;
pub mod render;
pub mod scene;
pub mod surface;

// Re-export commonly used types
pub use camera::PerspectiveCamera;
pub use fields::{
    load_field_configs, parse_field_configs, parse_hex_color, sparkle_presets, AnimationStyle,
    BlendMode, ConfigError, ParticleFieldConfig, Rgb, ShadingStyle,
};
pub use gpu::{GpuBackend, GpuContext, GpuError, GpuFieldRenderer};
pub use particles::{BufferError, FadePhase, ParticleBuffers, ParticleVertex};
pub use render::{FieldRenderer, RenderBackend};
pub use scene::{
    FieldFactory, FrameClock, FrameCount, IntervalClock, LiveField, ResizeSignal, SceneLoop,
    SceneRegistry,
};
pub use surface::{CanvasSurface, RenderSurface, SurfaceLookup, SurfaceMap, Viewport};
