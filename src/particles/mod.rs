//! Particle state and per-tick animation.
//!
//! This module provides:
//! - Structure-of-arrays particle buffers sampled from a field config
//! - The rising and expanding animation steps

pub mod buffers;
pub mod stepper;

pub use buffers::{BufferError, FadePhase, ParticleBuffers, ParticleVertex, BOUNDS_XY, BOUNDS_Z};
pub use stepper::{
    step, FADE_IN_RATE, FADE_OUT_RATE, GROWTH_RATE, MAX_FLARE_OPACITY, RISE_SPEED,
};
