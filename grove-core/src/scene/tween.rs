//! Time-bounded interpolation between two values.
//!
//! Tweens never hold a clock of their own; they are sampled against the
//! scene clock, so re-targeting mid-flight is just "sample now, start a new
//! tween from there".

use crate::layout::PointF;

/// Values that can be blended linearly.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for PointF {
    fn lerp(self, to: Self, t: f64) -> Self {
        PointF::lerp(self, to, t)
    }
}

/// Cubic ease-in-out: slow start and end. Used for every scene and camera move.
pub fn cubic_in_out(t: f64) -> f64 {
    let t2 = t.clamp(0.0, 1.0) * 2.0;
    if t2 <= 1.0 {
        t2 * t2 * t2 / 2.0
    } else {
        let u = t2 - 2.0;
        (u * u * u + 2.0) / 2.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    start: f64,
    duration: f64,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, start: f64, duration: f64) -> Self {
        Self {
            from,
            to,
            start,
            duration: duration.max(0.0),
        }
    }

    /// A tween that is already at rest on `value`.
    pub fn still(value: T) -> Self {
        Self::new(value, value, 0.0, 0.0)
    }

    pub fn from(&self) -> T {
        self.from
    }

    pub fn target(&self) -> T {
        self.to
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Linear progress in [0, 1] at time `now`.
    pub fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }

    pub fn sample(&self, now: f64) -> T {
        let t = cubic_in_out(self.progress(now));
        if t >= 1.0 {
            self.to
        } else {
            self.from.lerp(self.to, t)
        }
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now >= self.end()
    }
}
