//! Time-based scalar tweens.
//!
//! A [`Tween`] runs `repeat + 1` legs of `duration` each.  With `yoyo` set,
//! every odd leg runs backwards, so a one-repeat yoyo tween ends where it
//! started.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    QuadraticOut,
}

impl Easing {
    /// Map linear progress `t` (0.0–1.0) through the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear       => t,
            Easing::QuadraticOut => t * (2.0 - t),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from:     f32,
    to:       f32,
    duration: Duration,
    easing:   Easing,
    yoyo:     bool,
    repeat:   u32,
    elapsed:  Duration,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Tween {
            from,
            to,
            duration,
            easing:  Easing::Linear,
            yoyo:    false,
            repeat:  0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    pub fn repeat(mut self, times: u32) -> Self {
        self.repeat = times;
        self
    }

    /// Length of all legs together.
    pub fn total(&self) -> Duration {
        self.duration * (self.repeat + 1)
    }

    /// Advance by `dt` and return the new value.
    pub fn advance(&mut self, dt: Duration) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.total());
        self.value()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.total()
    }

    pub fn value(&self) -> f32 {
        if self.duration.is_zero() {
            return self.end_value();
        }
        let leg_secs = self.duration.as_secs_f32();
        let elapsed  = self.elapsed.as_secs_f32();
        let leg      = ((elapsed / leg_secs) as u32).min(self.repeat);
        let t        = ((elapsed - leg as f32 * leg_secs) / leg_secs).clamp(0.0, 1.0);

        let (a, b) = if self.yoyo && leg % 2 == 1 {
            (self.to, self.from)
        } else {
            (self.from, self.to)
        };
        a + (b - a) * self.easing.apply(t)
    }

    /// Value once every leg has run.
    pub fn end_value(&self) -> f32 {
        if self.yoyo && self.repeat % 2 == 1 { self.from } else { self.to }
    }
}
