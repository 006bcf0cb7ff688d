//! Positioned, styleable objects that can pulse.

use std::time::Duration;

use crate::tween::{Easing, Tween};
use crate::vec3::Vec3;

/// Scale multiplier at the top of a pulse.
pub const PULSE_FACTOR: f32 = 1.5;

/// Length of one pulse leg (grow, then shrink back).
pub const PULSE_DURATION: Duration = Duration::from_millis(200);

/// A box-like scene object.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveObject {
    pub position: Vec3,
    /// Edge length at rest.
    pub size:     f32,
    pub color:    u32,
    pub opacity:  f32,
    /// Current scale multiplier; 1.0 at rest.
    pub scale:    f32,
    pulse:        Option<Tween>,
}

impl InteractiveObject {
    pub fn new(position: Vec3, size: f32, color: u32) -> Self {
        InteractiveObject {
            position,
            size,
            color,
            opacity: 0.8,
            scale:   1.0,
            pulse:   None,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.pulse.is_some()
    }

    /// Start a pulse from the current scale.  Refused while one is running.
    pub fn start_pulse(&mut self) -> bool {
        if self.is_animating() {
            return false;
        }
        self.pulse = Some(
            Tween::new(self.scale, self.scale * PULSE_FACTOR, PULSE_DURATION)
                .easing(Easing::QuadraticOut)
                .yoyo(true)
                .repeat(1),
        );
        true
    }

    pub fn tick(&mut self, dt: Duration) {
        if let Some(tween) = self.pulse.as_mut() {
            self.scale = tween.advance(dt);
            if tween.is_finished() {
                self.pulse = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_grows_then_restores() {
        let mut o = InteractiveObject::new(Vec3::ZERO, 0.2, 0);
        assert!(o.start_pulse());
        o.tick(PULSE_DURATION);
        assert!((o.scale - PULSE_FACTOR).abs() < 1e-4);
        o.tick(PULSE_DURATION);
        assert!((o.scale - 1.0).abs() < 1e-4);
        assert!(!o.is_animating());
    }

    #[test]
    fn overlapping_pulse_refused() {
        let mut o = InteractiveObject::new(Vec3::ZERO, 0.2, 0);
        assert!(o.start_pulse());
        o.tick(Duration::from_millis(50));
        assert!(!o.start_pulse());
        o.tick(Duration::from_millis(400));
        assert!(o.start_pulse());
    }
}
