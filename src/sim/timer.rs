//! Timestamp-based cooldowns
//!
//! Every cooldown in the game is "now minus stored timestamp compared to a
//! constant". [`Timer`] keeps that comparison in one place.

use serde::{Deserialize, Serialize};

/// Game clock value in milliseconds
pub type Millis = f64;

/// A duration measured from the last time it was restarted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    pub duration: Millis,
    pub started_at: Millis,
}

impl Timer {
    /// Timer whose reference point is the start of the session (t = 0)
    pub const fn new(duration: Millis) -> Self {
        Self {
            duration,
            started_at: 0.0,
        }
    }

    pub const fn started(duration: Millis, now: Millis) -> Self {
        Self {
            duration,
            started_at: now,
        }
    }

    #[inline]
    pub fn restart(&mut self, now: Millis) {
        self.started_at = now;
    }

    #[inline]
    pub fn elapsed(&self, now: Millis) -> Millis {
        now - self.started_at
    }

    /// `elapsed >= duration`
    #[inline]
    pub fn done(&self, now: Millis) -> bool {
        self.elapsed(now) >= self.duration
    }

    /// `elapsed > duration`; a few cooldowns use the strict comparison
    #[inline]
    pub fn lapsed(&self, now: Millis) -> bool {
        self.elapsed(now) > self.duration
    }

    pub fn remaining(&self, now: Millis) -> Millis {
        (self.duration - self.elapsed(now)).max(0.0)
    }
}

/// A timer that can be switched off (power-ups, countdown)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Toggle {
    pub since: Option<Millis>,
}

impl Toggle {
    #[inline]
    pub fn is_on(&self) -> bool {
        self.since.is_some()
    }

    /// Turn on, or reset the reference point if already on
    pub fn set(&mut self, now: Millis) {
        self.since = Some(now);
    }

    pub fn clear(&mut self) {
        self.since = None;
    }

    pub fn elapsed(&self, now: Millis) -> Option<Millis> {
        self.since.map(|t| now - t)
    }

    /// Switch off once `duration` has elapsed; returns true on the tick it expires
    pub fn expire_after(&mut self, duration: Millis, now: Millis) -> bool {
        match self.elapsed(now) {
            Some(elapsed) if elapsed >= duration => {
                self.since = None;
                true
            }
            _ => false,
        }
    }
}

/// Looping sprite frame index advanced by elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameCounter {
    pub frame: u8,
    pub frames: u8,
    pub step: Millis,
    acc: Millis,
}

impl FrameCounter {
    pub fn new(frames: u8, step: Millis) -> Self {
        Self {
            frame: 0,
            frames: frames.max(1),
            step,
            acc: 0.0,
        }
    }

    /// Accumulate `dt`; moves to the next frame once more than `step` has built up
    pub fn advance(&mut self, dt: Millis) {
        self.acc += dt;
        if self.acc > self.step {
            self.frame = (self.frame + 1) % self.frames;
            self.acc = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_counter_wraps() {
        let mut anim = FrameCounter::new(4, 100.0);
        anim.advance(100.0);
        assert_eq!(anim.frame, 0);
        for _ in 0..4 {
            anim.advance(101.0);
        }
        assert_eq!(anim.frame, 0);
        anim.advance(60.0);
        anim.advance(60.0);
        assert_eq!(anim.frame, 1);
    }

    #[test]
    fn test_done_vs_lapsed() {
        let t = Timer::started(500.0, 1000.0);
        assert!(!t.done(1499.0));
        assert!(t.done(1500.0));
        assert!(!t.lapsed(1500.0));
        assert!(t.lapsed(1500.5));
    }

    #[test]
    fn test_remaining() {
        let mut t = Timer::new(1000.0);
        t.restart(2000.0);
        assert_eq!(t.remaining(2250.0), 750.0);
        assert_eq!(t.remaining(5000.0), 0.0);
    }

    #[test]
    fn test_toggle_expiry() {
        let mut toggle = Toggle::default();
        assert!(!toggle.is_on());
        toggle.set(100.0);
        assert!(!toggle.expire_after(10000.0, 10099.0));
        assert!(toggle.is_on());
        assert!(toggle.expire_after(10000.0, 10100.0));
        assert!(!toggle.is_on());
        // Already off: nothing to expire
        assert!(!toggle.expire_after(10000.0, 20000.0));
    }
}
