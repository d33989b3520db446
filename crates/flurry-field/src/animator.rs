//! The frame cadence: "call me again before the next repaint".
//!
//! The host owns the actual clock and calls [`Animator::tick`] whenever it's ready to paint. A
//! frame only happens if one was requested, and each frame requests the next, so cancelling is
//! immediate and total: nothing moves again until a new frame is requested.

use std::time::Instant;

use crate::canvas::Canvas;
use crate::field::Field;

/// The most frames a single tick can advance by. Stops a host that stalled (a suspended laptop,
/// say) from teleporting every particle when it wakes up.
pub const MAX_FRAMES_PER_TICK: f32 = 4.0;

/// Tracks whether a frame is pending and how much time has passed since the last one.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Animator {
    /// Whether the next tick should produce a frame.
    is_frame_requested: bool,
    /// When the previous frame ran.
    last_frame_at: Option<Instant>,
    /// See [`MAX_FRAMES_PER_TICK`].
    pub max_frames_per_tick: f32,
}

impl Default for Animator {
    #[inline]
    fn default() -> Self {
        Self {
            is_frame_requested: false,
            last_frame_at: None,
            max_frames_per_tick: MAX_FRAMES_PER_TICK,
        }
    }
}

impl Animator {
    /// An animator that already has its first frame requested.
    #[inline]
    #[must_use]
    pub fn started() -> Self {
        let mut animator = Self::default();
        animator.request_frame();
        animator
    }

    /// Ask for a frame on the next tick.
    #[inline]
    pub const fn request_frame(&mut self) {
        self.is_frame_requested = true;
    }

    /// Drop any pending frame. Timing restarts from scratch when frames are requested again.
    #[inline]
    pub const fn cancel(&mut self) {
        self.is_frame_requested = false;
        self.last_frame_at = None;
    }

    /// Whether a frame is pending.
    #[inline]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.is_frame_requested
    }

    /// Consume the pending frame, if there is one, returning how many reference frames have
    /// elapsed since the previous one. The very first frame counts as exactly one.
    #[inline]
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        if !self.is_frame_requested {
            return None;
        }
        self.is_frame_requested = false;

        let frames = self.last_frame_at.map_or(1.0, |last| {
            now.saturating_duration_since(last).as_secs_f32() * crate::REFERENCE_FRAME_RATE
        });
        self.last_frame_at = Some(now);

        Some(frames.clamp(0.0, self.max_frames_per_tick.max(0.0)))
    }

    /// Run a whole frame of `field` if one is due, then ask for the next one. Returns whether a
    /// frame ran.
    #[inline]
    pub fn run_frame(&mut self, now: Instant, field: &mut Field, canvas: &mut impl Canvas) -> bool {
        let Some(frames) = self.tick(now) else {
            return false;
        };

        field.frame(frames, canvas);
        self.request_frame();
        true
    }
}
