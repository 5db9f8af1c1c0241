//! Sprite shading programs.
//!
//! The WGSL source holds one vertex entry point and one fragment entry point
//! per [`ShadingStyle`]. The CPU functions here reproduce the same math so
//! sprite coverage can be checked without a GPU.

use crate::fields::ShadingStyle;

/// WGSL source for the particle pipeline.
pub const PARTICLE_SHADER: &str = include_str!("shaders/particles.wgsl");

pub const VERTEX_ENTRY: &str = "vs_main";

/// Scale from world size to pixels at unit view depth.
pub const POINT_SCALE: f32 = 300.0;

/// Sprite edge length in pixels for a particle at view-space depth `view_z`.
///
/// `view_z` is negative in front of the camera. Points at or behind the eye
/// collapse to zero.
pub fn point_size(size: f32, view_z: f32) -> f32 {
    (size * (POINT_SCALE / -view_z)).max(0.0)
}

impl ShadingStyle {
    /// Fragment entry point implementing this style.
    pub fn fragment_entry(&self) -> &'static str {
        match self {
            Self::Soft => "fs_soft",
            Self::Flare => "fs_flare",
        }
    }

    /// Output alpha at `point_coord` (0..1 across the sprite), or `None` where
    /// the fragment is discarded.
    pub fn fragment_alpha(&self, point_coord: [f32; 2], opacity: f32) -> Option<f32> {
        match self {
            Self::Soft => {
                let cx = 2.0 * point_coord[0] - 1.0;
                let cy = 2.0 * point_coord[1] - 1.0;
                let r = cx * cx + cy * cy;
                (r <= 1.0).then_some(opacity)
            }
            Self::Flare => {
                let dx = point_coord[0] - 0.5;
                let dy = point_coord[1] - 0.5;
                let r = dx * dx + dy * dy;
                (r <= 0.25).then(|| (1.0 - r * 4.0) * opacity)
            }
        }
    }
}
