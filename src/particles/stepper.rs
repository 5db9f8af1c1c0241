//! One-tick particle animation.
//!
//! Every call advances a field by exactly one frame; there is no wall-clock
//! delta, so dropped frames simply slow the animation down.

use super::buffers::{random_xy, FadePhase, ParticleBuffers, BOUNDS_XY};
use crate::fields::AnimationStyle;
use rand::Rng;

/// Upward drift of rising particles per tick.
pub const RISE_SPEED: f32 = 0.1;
/// Opacity gained per tick while fading in.
pub const FADE_IN_RATE: f32 = 0.015;
/// Opacity lost per tick while fading out.
pub const FADE_OUT_RATE: f32 = 0.01;
/// Size gained per tick while fading out.
pub const GROWTH_RATE: f32 = 0.1;
/// Opacity at which an expanding particle starts fading out.
pub const MAX_FLARE_OPACITY: f32 = 0.7;

/// Advance every particle in `buffers` by one tick.
///
/// Randomness is only drawn when a particle wraps or restarts its fade cycle.
pub fn step<R: Rng + ?Sized>(buffers: &mut ParticleBuffers, rng: &mut R) {
    match buffers.style {
        AnimationStyle::Rising => step_rising(buffers, rng),
        AnimationStyle::Expanding => step_expanding(buffers, rng),
    }
}

fn step_rising<R: Rng + ?Sized>(buffers: &mut ParticleBuffers, rng: &mut R) {
    for vertex in &mut buffers.vertices {
        let position = &mut vertex.position;
        position[1] += RISE_SPEED;
        if position[1] > BOUNDS_XY {
            position[1] = -BOUNDS_XY;
            // New column, otherwise wrapped particles retrace the same streak.
            position[0] = random_xy(rng);
        }
    }
}

fn step_expanding<R: Rng + ?Sized>(buffers: &mut ParticleBuffers, rng: &mut R) {
    let particles = buffers
        .vertices
        .iter_mut()
        .zip(&buffers.velocities)
        .zip(buffers.phases.iter_mut().zip(&buffers.initial_sizes));

    for ((vertex, velocity), (phase, initial_size)) in particles {
        vertex.position[0] += velocity[0];
        vertex.position[1] += velocity[1];

        match phase {
            FadePhase::FadingIn => {
                vertex.opacity += FADE_IN_RATE;
                if vertex.opacity >= MAX_FLARE_OPACITY {
                    vertex.opacity = MAX_FLARE_OPACITY;
                    *phase = FadePhase::FadingOut;
                }
            }
            FadePhase::FadingOut => {
                vertex.size += GROWTH_RATE;
                vertex.opacity -= FADE_OUT_RATE;
                if vertex.opacity <= 0.0 {
                    vertex.position[0] = random_xy(rng);
                    vertex.position[1] = random_xy(rng);
                    vertex.size = *initial_size;
                    vertex.opacity = 0.0;
                    *phase = FadePhase::FadingIn;
                }
            }
        }
    }
}
