//! Frame clock and the per-frame loop.

use super::SceneRegistry;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

/// Source of display refresh ticks.
pub trait FrameClock {
    /// Block until the next frame is due. Returns `false` to stop the loop.
    fn next_frame(&mut self) -> bool;
}

/// Runs a fixed number of frames back to back.
#[derive(Debug, Clone)]
pub struct FrameCount {
    remaining: u64,
}

impl FrameCount {
    pub fn new(frames: u64) -> Self {
        Self { remaining: frames }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl FrameClock for FrameCount {
    fn next_frame(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Paces frames at a target refresh rate, optionally for a limited number of frames.
#[derive(Debug, Clone)]
pub struct IntervalClock {
    interval: Duration,
    next_deadline: Option<Instant>,
    frame_limit: Option<u64>,
    frames: u64,
}

impl IntervalClock {
    pub fn new(refresh_hz: f64) -> Self {
        let hz = if refresh_hz.is_finite() && refresh_hz > 0.0 { refresh_hz } else { 60.0 };
        Self {
            interval: Duration::from_secs_f64(1.0 / hz),
            next_deadline: None,
            frame_limit: None,
            frames: 0,
        }
    }

    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameClock for IntervalClock {
    fn next_frame(&mut self) -> bool {
        if self.frame_limit.is_some_and(|limit| self.frames >= limit) {
            return false;
        }

        let now = Instant::now();
        match self.next_deadline {
            Some(deadline) if deadline > now => {
                std::thread::sleep(deadline - now);
                self.next_deadline = Some(deadline + self.interval);
            }
            // First frame, or running late: skip ahead instead of catching up.
            _ => self.next_deadline = Some(now + self.interval),
        }

        self.frames += 1;
        true
    }
}

/// Handle used by the host to report viewport resizes to a running loop.
#[derive(Debug, Clone)]
pub struct ResizeSignal {
    sender: Sender<()>,
}

impl ResizeSignal {
    pub fn notify(&self) {
        // Loop already gone; nothing left to resize.
        let _ = self.sender.send(());
    }
}

/// Drives the registry: one step and draw per field on every frame.
pub struct SceneLoop {
    registry: SceneRegistry,
    resize_events: Option<Receiver<()>>,
    frames: u64,
}

impl SceneLoop {
    pub fn new(registry: SceneRegistry) -> Self {
        Self {
            registry,
            resize_events: None,
            frames: 0,
        }
    }

    /// Create a resize handle. Pending notifications are applied before the next frame.
    pub fn resize_signal(&mut self) -> ResizeSignal {
        let (sender, receiver) = mpsc::channel();
        self.resize_events = Some(receiver);
        ResizeSignal { sender }
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SceneRegistry {
        &mut self.registry
    }

    pub fn into_registry(self) -> SceneRegistry {
        self.registry
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Apply pending resizes, then step and draw every field once.
    pub fn frame(&mut self) {
        self.apply_resizes();
        self.registry.tick();
        self.frames += 1;
    }

    /// Run until the clock stops. Returns the number of frames rendered.
    ///
    /// With no live fields the clock is never consulted.
    pub fn run<C: FrameClock + ?Sized>(&mut self, clock: &mut C) -> u64 {
        if self.registry.is_empty() {
            log::debug!("No live particle fields, frame loop not started");
            return 0;
        }

        let start = self.frames;
        while clock.next_frame() {
            self.frame();
        }
        self.frames - start
    }

    fn apply_resizes(&mut self) {
        let Some(events) = &self.resize_events else {
            return;
        };
        // Collapse a burst of resize events into one recompute.
        if events.try_iter().count() > 0 {
            self.registry.resize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_stops() {
        let mut clock = FrameCount::new(3);
        assert!(clock.next_frame());
        assert!(clock.next_frame());
        assert!(clock.next_frame());
        assert!(!clock.next_frame());
        assert_eq!(clock.remaining(), 0);
    }

    #[test]
    fn test_interval_clock_respects_limit() {
        let mut clock = IntervalClock::new(1000.0).with_frame_limit(2);
        assert!(clock.next_frame());
        assert!(clock.next_frame());
        assert!(!clock.next_frame());
    }

    #[test]
    fn test_interval_clock_paces_frames() {
        let mut clock = IntervalClock::new(200.0).with_frame_limit(3);
        let start = Instant::now();
        while clock.next_frame() {}
        // Two waits of 5ms after the first frame.
        assert!(start.elapsed() >= Duration::from_millis(9));
    }

    #[test]
    fn test_interval_clock_rejects_bad_rate() {
        assert_eq!(IntervalClock::new(0.0).interval(), Duration::from_secs_f64(1.0 / 60.0));
    }

    #[test]
    fn test_empty_registry_never_ticks_clock() {
        let mut scene = SceneLoop::new(SceneRegistry::new());
        let mut clock = FrameCount::new(5);
        assert_eq!(scene.run(&mut clock), 0);
        assert_eq!(clock.remaining(), 5);
    }
}
