//! Render surfaces the host page exposes to the engine.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Highest device pixel ratio a field renders at.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// A drawable region with a current content box.
pub trait RenderSurface: Send + Sync {
    /// Content-box size in CSS pixels.
    fn content_size(&self) -> (u32, u32);

    fn device_pixel_ratio(&self) -> f32 {
        1.0
    }
}

/// Resolves surface identifiers to live surfaces.
pub trait SurfaceLookup {
    fn surface(&self, id: &str) -> Option<Arc<dyn RenderSurface>>;
}

/// Physical size of a field's render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Target size for `surface`, scaling the content box by the capped pixel ratio.
    pub fn of(surface: &dyn RenderSurface) -> Self {
        let (width, height) = surface.content_size();
        Self::scaled(width, height, surface.device_pixel_ratio())
    }

    pub fn scaled(width: u32, height: u32, pixel_ratio: f32) -> Self {
        let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        };
        Self {
            width: ((width as f32 * ratio).round() as u32).max(1),
            height: ((height as f32 * ratio).round() as u32).max(1),
        }
    }
}

/// In-memory canvas whose content box can be resized from any thread.
#[derive(Debug)]
pub struct CanvasSurface {
    width: AtomicU32,
    height: AtomicU32,
    pixel_ratio: f32,
}

impl CanvasSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_pixel_ratio(width, height, 1.0)
    }

    pub fn with_pixel_ratio(width: u32, height: u32, pixel_ratio: f32) -> Self {
        Self {
            width: AtomicU32::new(width),
            height: AtomicU32::new(height),
            pixel_ratio,
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.width.store(width, Ordering::Relaxed);
        self.height.store(height, Ordering::Relaxed);
    }
}

impl RenderSurface for CanvasSurface {
    fn content_size(&self) -> (u32, u32) {
        (self.width.load(Ordering::Relaxed), self.height.load(Ordering::Relaxed))
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }
}

/// Surfaces keyed by identifier.
#[derive(Default, Clone)]
pub struct SurfaceMap {
    surfaces: HashMap<String, Arc<dyn RenderSurface>>,
}

impl SurfaceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, surface: Arc<dyn RenderSurface>) {
        self.surfaces.insert(id.into(), surface);
    }

    /// Builder-style insert.
    pub fn with(mut self, id: impl Into<String>, surface: Arc<dyn RenderSurface>) -> Self {
        self.insert(id, surface);
        self
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl SurfaceLookup for SurfaceMap {
    fn surface(&self, id: &str) -> Option<Arc<dyn RenderSurface>> {
        self.surfaces.get(id).cloned()
    }
}
