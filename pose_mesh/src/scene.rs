//! Everything the stage draws besides the zones: the current bodies, the
//! interactive boxes, and short-lived gesture feedback effects.

use std::time::Duration;

use pose_gesture::Pose;
use pose_zones::{
    Easing, InteractiveObject, ObjectId, ObjectRegistry, SceneObjects, Tween, Vec3,
};
use tracing::debug;

use crate::config::SceneConfig;

/// Lifetime of one feedback effect.
pub const FEEDBACK_DURATION: Duration = Duration::from_millis(500);
pub const FEEDBACK_COLOR:    u32      = 0xFFFF0000;
/// Radius of a feedback ring at scale 1, in pose units.
pub const FEEDBACK_RADIUS:   f32      = 0.05;

// ════════════════════════════════════════════════════════════════════════════
// FeedbackEffect
// ════════════════════════════════════════════════════════════════════════════

/// A ring that grows and fades where a gesture was recognised.
#[derive(Debug, Clone)]
pub struct FeedbackEffect {
    pub position: Vec3,
    pub scale:    f32,
    pub opacity:  f32,
    grow:         Tween,
    fade:         Tween,
}

impl FeedbackEffect {
    pub fn new(position: Vec3) -> Self {
        FeedbackEffect {
            position,
            scale:   1.0,
            opacity: 0.8,
            grow:    Tween::new(1.0, 2.0, FEEDBACK_DURATION).easing(Easing::QuadraticOut),
            fade:    Tween::new(0.8, 0.0, FEEDBACK_DURATION).easing(Easing::QuadraticOut),
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.scale   = self.grow.advance(dt);
        self.opacity = self.fade.advance(dt);
    }

    pub fn is_done(&self) -> bool {
        self.grow.is_finished()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Scene
// ════════════════════════════════════════════════════════════════════════════

pub struct Scene {
    bodies:         Vec<Pose>,
    boxes:          ObjectRegistry<InteractiveObject>,
    feedback:       ObjectRegistry<FeedbackEffect>,
    feedback_limit: usize,
}

impl Scene {
    pub fn new(feedback_limit: usize) -> Self {
        Scene {
            bodies:         Vec::new(),
            boxes:          ObjectRegistry::new(),
            feedback:       ObjectRegistry::new(),
            feedback_limit: feedback_limit.max(1),
        }
    }

    /// Scene with the configured boxes in place.
    pub fn from_config(cfg: &SceneConfig) -> Self {
        let mut scene = Scene::new(cfg.feedback_limit);
        for b in &cfg.boxes {
            scene.add_box(Vec3::from(b.position), b.size, 0xFF000000 | b.color);
        }
        scene
    }

    pub fn add_box(&mut self, position: Vec3, size: f32, color: u32) -> ObjectId {
        self.boxes.insert(InteractiveObject::new(position, size, color))
    }

    /// Replace the bodies shown on stage.
    pub fn set_bodies(&mut self, bodies: &[Pose]) {
        self.bodies.clear();
        self.bodies.extend_from_slice(bodies);
    }

    /// Start a feedback effect at `position`, evicting the oldest when the
    /// pool is full.
    pub fn spawn_feedback(&mut self, position: Vec3) -> ObjectId {
        while self.feedback.len() >= self.feedback_limit {
            if let Some((id, _)) = self.feedback.pop_oldest() {
                debug!(effect = %id, "feedback pool full; dropped oldest");
            }
        }
        self.feedback.insert(FeedbackEffect::new(position))
    }

    /// Advance every animation by `dt` and drop finished effects.
    pub fn tick(&mut self, dt: Duration) {
        for (_, b) in self.boxes.iter_mut() {
            b.tick(dt);
        }
        self.feedback.retain(|_, fx| {
            fx.tick(dt);
            !fx.is_done()
        });
    }

    pub fn bodies(&self) -> &[Pose] { &self.bodies }
    pub fn boxes(&self) -> &ObjectRegistry<InteractiveObject> { &self.boxes }
    pub fn feedback(&self) -> &ObjectRegistry<FeedbackEffect> { &self.feedback }
}

impl SceneObjects for Scene {
    fn object_positions(&self) -> Vec<(ObjectId, Vec3)> {
        self.boxes.object_positions()
    }

    fn pulse(&mut self, id: ObjectId) -> bool {
        self.boxes.pulse(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration { Duration::from_millis(n) }

    #[test]
    fn feedback_grows_fades_and_expires() {
        let mut scene = Scene::new(16);
        let id = scene.spawn_feedback(Vec3::ZERO);

        scene.tick(ms(250));
        let fx = scene.feedback().get(id).unwrap();
        assert!(fx.scale > 1.5 && fx.scale < 2.0);
        assert!(fx.opacity > 0.0 && fx.opacity < 0.4);

        scene.tick(ms(250));
        assert!(scene.feedback().is_empty());
    }

    #[test]
    fn feedback_pool_drops_oldest() {
        let mut scene = Scene::new(3);
        let ids: Vec<ObjectId> = (0..5)
            .map(|i| scene.spawn_feedback(Vec3::new(i as f32, 0.0, 0.0)))
            .collect();
        assert_eq!(scene.feedback().len(), 3);
        assert!(scene.feedback().get(ids[1]).is_none());
        assert!(scene.feedback().get(ids[2]).is_some());
        assert!(scene.feedback().get(ids[4]).is_some());
    }

    #[test]
    fn boxes_from_config_are_opaque_colored() {
        let scene = Scene::from_config(&SceneConfig::default());
        let (_, b) = scene.boxes().iter().next().unwrap();
        assert_eq!(b.color, 0xFF00FF00);
        assert_eq!(scene.object_positions().len(), 1);
    }

    #[test]
    fn pulse_goes_through_to_boxes() {
        let mut scene = Scene::new(4);
        let id = scene.add_box(Vec3::ZERO, 0.1, 0xFFFFFFFF);
        assert!(scene.pulse(id));
        assert!(!scene.pulse(id));
        scene.tick(ms(400));
        assert!(!scene.boxes().get(id).unwrap().is_animating());
        assert!((scene.boxes().get(id).unwrap().scale - 1.0).abs() < 1e-4);
    }
}
