//! Per-particle state for one live field.

use super::stepper::MAX_FLARE_OPACITY;
use crate::fields::{AnimationStyle, ParticleFieldConfig};
use rand::seq::SliceRandom;
use rand::Rng;

/// Half-extent of the spawn volume on the x and y axes (world units).
pub const BOUNDS_XY: f32 = 100.0;
/// Half-extent of the spawn volume on the z axis (world units).
pub const BOUNDS_Z: f32 = 50.0;

/// Particle attributes consumed by the vertex shader, one per sprite instance.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub size: f32,
    pub opacity: f32,
}

/// Which half of the fade cycle an expanding particle is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadePhase {
    FadingIn,
    FadingOut,
}

#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Expected {expected} velocities, got {actual}")]
    VelocityCount { expected: usize, actual: usize },
    #[error("Expected {expected} fade phases for {style:?} particles, got {actual}")]
    PhaseCount {
        style: AnimationStyle,
        expected: usize,
        actual: usize,
    },
    #[error("Particle {0} has a negative size or opacity")]
    NegativeAttribute(usize),
    #[error("Expanding particle {index} has opacity {opacity} above the {max} cap")]
    OpacityAboveCap { index: usize, opacity: f32, max: f32 },
}

/// Mutable numeric state of every particle in a field.
///
/// All arrays share one length. Fade phases exist only for expanding fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleBuffers {
    pub(super) style: AnimationStyle,
    pub(super) vertices: Vec<ParticleVertex>,
    pub(super) velocities: Vec<[f32; 2]>,
    pub(super) initial_sizes: Vec<f32>,
    pub(super) phases: Vec<FadePhase>,
}

/// Uniform coordinate inside the x/y spawn range.
pub(super) fn random_xy<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(-BOUNDS_XY..BOUNDS_XY)
}

impl ParticleBuffers {
    /// Sample a fresh set of particles for the given field.
    ///
    /// The config is expected to have passed [`ParticleFieldConfig::validate`].
    pub fn spawn<R: Rng + ?Sized>(config: &ParticleFieldConfig, rng: &mut R) -> Self {
        let count = config.particle_count as usize;
        let [min_size, max_size] = config.size_range;
        let style = config.animation_style;

        let mut vertices = Vec::with_capacity(count);
        let mut velocities = Vec::with_capacity(count);
        let mut initial_sizes = Vec::with_capacity(count);
        let mut phases = Vec::with_capacity(if style == AnimationStyle::Expanding { count } else { 0 });

        for _ in 0..count {
            let position = [random_xy(rng), random_xy(rng), rng.gen_range(-BOUNDS_Z..BOUNDS_Z)];
            let color = config
                .color_palette
                .choose(rng)
                .map(|c| c.0)
                .unwrap_or([1.0, 1.0, 1.0]);
            let size = rng.gen_range(min_size..=max_size);

            // Horizontal jitter with an upward bias.
            velocities.push([rng.gen_range(-0.05..0.05), rng.gen_range(0.05..0.15)]);

            let opacity = match style {
                AnimationStyle::Rising => rng.gen_range(0.4..0.9),
                AnimationStyle::Expanding => {
                    if rng.gen_bool(0.5) {
                        phases.push(FadePhase::FadingIn);
                        0.0
                    } else {
                        phases.push(FadePhase::FadingOut);
                        rng.gen_range(0.2..0.7)
                    }
                }
            };

            vertices.push(ParticleVertex {
                position,
                color,
                size,
                opacity,
            });
            initial_sizes.push(size);
        }

        Self {
            style,
            vertices,
            velocities,
            initial_sizes,
            phases,
        }
    }

    /// Assemble buffers from explicit particle state.
    ///
    /// Initial sizes are snapshotted from the vertices. `phases` must be empty
    /// for rising fields and match the particle count for expanding ones.
    pub fn from_parts(
        style: AnimationStyle,
        vertices: Vec<ParticleVertex>,
        velocities: Vec<[f32; 2]>,
        phases: Vec<FadePhase>,
    ) -> Result<Self, BufferError> {
        let count = vertices.len();
        if velocities.len() != count {
            return Err(BufferError::VelocityCount {
                expected: count,
                actual: velocities.len(),
            });
        }
        let expected_phases = match style {
            AnimationStyle::Rising => 0,
            AnimationStyle::Expanding => count,
        };
        if phases.len() != expected_phases {
            return Err(BufferError::PhaseCount {
                style,
                expected: expected_phases,
                actual: phases.len(),
            });
        }
        if let Some(i) = vertices.iter().position(|v| v.size < 0.0 || v.opacity < 0.0) {
            return Err(BufferError::NegativeAttribute(i));
        }
        if style == AnimationStyle::Expanding {
            if let Some(i) = vertices.iter().position(|v| v.opacity > MAX_FLARE_OPACITY) {
                return Err(BufferError::OpacityAboveCap {
                    index: i,
                    opacity: vertices[i].opacity,
                    max: MAX_FLARE_OPACITY,
                });
            }
        }

        let initial_sizes = vertices.iter().map(|v| v.size).collect();
        Ok(Self {
            style,
            vertices,
            velocities,
            initial_sizes,
            phases,
        })
    }

    pub fn style(&self) -> AnimationStyle {
        self.style
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[ParticleVertex] {
        &self.vertices
    }

    pub fn velocities(&self) -> &[[f32; 2]] {
        &self.velocities
    }

    pub fn initial_sizes(&self) -> &[f32] {
        &self.initial_sizes
    }

    /// Fade phases, empty for rising fields.
    pub fn phases(&self) -> &[FadePhase] {
        &self.phases
    }

    pub fn phase(&self, index: usize) -> Option<FadePhase> {
        self.phases.get(index).copied()
    }

    /// Raw bytes of the vertex array, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{BlendMode, Rgb, ShadingStyle};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(style: AnimationStyle) -> ParticleFieldConfig {
        ParticleFieldConfig {
            surface_id: "test".to_string(),
            particle_count: 500,
            color_palette: vec![Rgb::from_hex(0xff0000), Rgb::from_hex(0x00ff00)],
            size_range: [10.0, 40.0],
            animation_style: style,
            blend_mode: BlendMode::Additive,
            shading_style: ShadingStyle::Flare,
        }
    }

    #[test]
    fn test_spawn_lengths_match_particle_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let rising = ParticleBuffers::spawn(&config(AnimationStyle::Rising), &mut rng);
        assert_eq!(rising.len(), 500);
        assert_eq!(rising.velocities().len(), 500);
        assert_eq!(rising.initial_sizes().len(), 500);
        assert!(rising.phases().is_empty());

        let expanding = ParticleBuffers::spawn(&config(AnimationStyle::Expanding), &mut rng);
        assert_eq!(expanding.len(), 500);
        assert_eq!(expanding.phases().len(), 500);
    }

    #[test]
    fn test_spawn_samples_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = config(AnimationStyle::Rising);
        let buffers = ParticleBuffers::spawn(&config, &mut rng);

        for v in buffers.vertices() {
            assert!(v.position[0] >= -BOUNDS_XY && v.position[0] < BOUNDS_XY);
            assert!(v.position[1] >= -BOUNDS_XY && v.position[1] < BOUNDS_XY);
            assert!(v.position[2] >= -BOUNDS_Z && v.position[2] < BOUNDS_Z);
            assert!(v.size >= 10.0 && v.size <= 40.0);
            assert!(v.opacity >= 0.4 && v.opacity < 0.9);
            assert!(config.color_palette.iter().any(|c| c.0 == v.color));
        }
        for (v, initial) in buffers.vertices().iter().zip(buffers.initial_sizes()) {
            assert_eq!(v.size, *initial);
        }
        for vel in buffers.velocities() {
            assert!(vel[0] >= -0.05 && vel[0] < 0.05);
            assert!(vel[1] >= 0.05 && vel[1] < 0.15);
        }
    }

    #[test]
    fn test_expanding_spawn_opacity_matches_phase() {
        let mut rng = StdRng::seed_from_u64(3);
        let buffers = ParticleBuffers::spawn(&config(AnimationStyle::Expanding), &mut rng);

        let mut saw_in = false;
        let mut saw_out = false;
        for (v, phase) in buffers.vertices().iter().zip(buffers.phases()) {
            match phase {
                FadePhase::FadingIn => {
                    saw_in = true;
                    assert_eq!(v.opacity, 0.0);
                }
                FadePhase::FadingOut => {
                    saw_out = true;
                    assert!(v.opacity >= 0.2 && v.opacity < 0.7);
                }
            }
        }
        assert!(saw_in && saw_out, "500 particles should cover both phases");
    }

    #[test]
    fn test_from_parts_rejects_mismatched_lengths() {
        let vertex = ParticleVertex {
            position: [0.0; 3],
            color: [1.0; 3],
            size: 1.0,
            opacity: 0.5,
        };

        let err = ParticleBuffers::from_parts(AnimationStyle::Rising, vec![vertex; 2], vec![[0.0; 2]], vec![]);
        assert!(matches!(err, Err(BufferError::VelocityCount { expected: 2, actual: 1 })));

        let err = ParticleBuffers::from_parts(AnimationStyle::Expanding, vec![vertex], vec![[0.0; 2]], vec![]);
        assert!(matches!(err, Err(BufferError::PhaseCount { .. })));

        let err = ParticleBuffers::from_parts(
            AnimationStyle::Rising,
            vec![vertex],
            vec![[0.0; 2]],
            vec![FadePhase::FadingIn],
        );
        assert!(matches!(err, Err(BufferError::PhaseCount { expected: 0, .. })));

        let negative = ParticleVertex { size: -1.0, ..vertex };
        let err = ParticleBuffers::from_parts(AnimationStyle::Rising, vec![negative], vec![[0.0; 2]], vec![]);
        assert!(matches!(err, Err(BufferError::NegativeAttribute(0))));

        let bright = ParticleVertex { opacity: 0.95, ..vertex };
        let at_cap = ParticleVertex { opacity: MAX_FLARE_OPACITY, ..vertex };
        let err = ParticleBuffers::from_parts(
            AnimationStyle::Expanding,
            vec![at_cap, bright],
            vec![[0.0; 2]; 2],
            vec![FadePhase::FadingOut; 2],
        );
        assert!(matches!(err, Err(BufferError::OpacityAboveCap { index: 1, .. })));

        // Rising opacity is not capped.
        let ok = ParticleBuffers::from_parts(AnimationStyle::Rising, vec![bright], vec![[0.0; 2]], vec![]);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_vertex_memory_layout() {
        assert_eq!(std::mem::size_of::<ParticleVertex>(), 32);
        let mut rng = StdRng::seed_from_u64(9);
        let buffers = ParticleBuffers::spawn(&config(AnimationStyle::Rising), &mut rng);
        assert_eq!(buffers.as_bytes().len(), 500 * 32);
    }
}
