//! Zone hit-testing against the right wrist.

use pose_gesture::{Joint, Pose};
use tracing::debug;

use crate::object::InteractiveObject;
use crate::registry::{ObjectId, ObjectRegistry};
use crate::vec3::Vec3;

pub const DEFAULT_ZONE_RADIUS: f32 = 0.3;
pub const IDLE_OPACITY:        f32 = 0.2;
pub const ACTIVE_OPACITY:      f32 = 0.4;

/// Objects closer than this to an activated zone's center pulse.
pub const PULSE_RADIUS: f32 = 1.0;

// ════════════════════════════════════════════════════════════════════════════
// SceneObjects — what the tracker needs from a scene
// ════════════════════════════════════════════════════════════════════════════

/// Anything that owns positioned objects and can pulse them by id.
pub trait SceneObjects {
    fn object_positions(&self) -> Vec<(ObjectId, Vec3)>;

    /// Start a pulse on `id`.  False when the id is unknown or a pulse is
    /// already running on it.
    fn pulse(&mut self, id: ObjectId) -> bool;
}

impl SceneObjects for ObjectRegistry<InteractiveObject> {
    fn object_positions(&self) -> Vec<(ObjectId, Vec3)> {
        self.iter().map(|(id, o)| (id, o.position)).collect()
    }

    fn pulse(&mut self, id: ObjectId) -> bool {
        self.get_mut(id).map_or(false, InteractiveObject::start_pulse)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// InteractionZone
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionZone {
    pub center:  Vec3,
    pub radius:  f32,
    /// Whether the wrist was inside on the last check.
    pub active:  bool,
    pub opacity: f32,
}

impl InteractionZone {
    pub fn new(center: Vec3, radius: f32) -> Self {
        InteractionZone { center, radius, active: false, opacity: IDLE_OPACITY }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.distance_to(self.center) < self.radius
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ZoneTracker
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct ZoneTracker {
    zones: ObjectRegistry<InteractionZone>,
}

impl ZoneTracker {
    pub fn new() -> Self {
        ZoneTracker::default()
    }

    pub fn add_zone(&mut self, center: Vec3, radius: f32) -> ObjectId {
        self.zones.insert(InteractionZone::new(center, radius))
    }

    pub fn zones(&self) -> &ObjectRegistry<InteractionZone> {
        &self.zones
    }

    /// Hit-test the right wrist against every zone.
    ///
    /// Zones containing the wrist become active (and more opaque), and every
    /// scene object within [`PULSE_RADIUS`] of such a zone's center is asked to
    /// pulse.  Zones the wrist left go back to idle.  A pose without a right
    /// wrist changes nothing.  Returns the zones activated by this check.
    pub fn check<S: SceneObjects>(&mut self, pose: &Pose, scene: &mut S) -> Vec<ObjectId> {
        let Some(hand) = pose.get(Joint::RightWrist) else {
            return Vec::new();
        };
        let hand = Vec3::from(hand);

        let mut activated = Vec::new();
        for (id, zone) in self.zones.iter_mut() {
            zone.active  = zone.contains(hand);
            zone.opacity = if zone.active { ACTIVE_OPACITY } else { IDLE_OPACITY };
            if zone.active {
                activated.push((id, zone.center));
            }
        }

        if activated.is_empty() {
            return Vec::new();
        }

        let objects = scene.object_positions();
        for &(zone_id, center) in &activated {
            for &(obj_id, pos) in &objects {
                if pos.distance_to(center) < PULSE_RADIUS && scene.pulse(obj_id) {
                    debug!(zone = %zone_id, object = %obj_id, "pulse");
                }
            }
        }

        activated.into_iter().map(|(id, _)| id).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use pose_gesture::Keypoint;

    fn hand_at(x: f32, y: f32, z: f32) -> Pose {
        Pose::from_keypoints(vec![Keypoint::joint(Joint::RightWrist, x, y, z)])
    }

    fn scene() -> (ObjectRegistry<InteractiveObject>, ObjectId, ObjectId) {
        let mut s = ObjectRegistry::new();
        let near = s.insert(InteractiveObject::new(Vec3::new(0.0, 0.0, 0.0), 0.2, 0));
        let far  = s.insert(InteractiveObject::new(Vec3::new(3.0, 0.0, 0.0), 0.2, 0));
        (s, near, far)
    }

    #[test]
    fn wrist_inside_activates_and_pulses_nearby_only() {
        let (mut s, near, far) = scene();
        let mut t = ZoneTracker::new();
        let z = t.add_zone(Vec3::new(0.5, 0.5, 0.0), DEFAULT_ZONE_RADIUS);

        let hit = t.check(&hand_at(0.5, 0.6, 0.0), &mut s);
        assert_eq!(hit, vec![z]);
        let zone = t.zones().get(z).unwrap();
        assert!(zone.active);
        assert_eq!(zone.opacity, ACTIVE_OPACITY);
        assert!(s.get(near).unwrap().is_animating());
        assert!(!s.get(far).unwrap().is_animating());
    }

    #[test]
    fn boundary_is_exclusive() {
        let (mut s, _, _) = scene();
        let mut t = ZoneTracker::new();
        t.add_zone(Vec3::new(0.0, 0.0, 0.0), 0.5);
        assert!(t.check(&hand_at(0.5, 0.0, 0.0), &mut s).is_empty());
        assert_eq!(t.check(&hand_at(0.25, 0.0, 0.0), &mut s).len(), 1);
    }

    #[test]
    fn depth_counts() {
        let (mut s, _, _) = scene();
        let mut t = ZoneTracker::new();
        t.add_zone(Vec3::new(0.5, 0.5, 0.0), 0.3);
        assert!(t.check(&hand_at(0.5, 0.5, 0.5), &mut s).is_empty());
    }

    #[test]
    fn missing_wrist_changes_nothing() {
        let (mut s, near, _) = scene();
        let mut t = ZoneTracker::new();
        let z = t.add_zone(Vec3::new(0.5, 0.5, 0.0), 0.3);
        t.check(&hand_at(0.5, 0.5, 0.0), &mut s);
        let hit = t.check(&Pose::new(), &mut s);
        assert!(hit.is_empty());
        assert!(t.zones().get(z).unwrap().active);
        assert!(s.get(near).unwrap().is_animating());
    }

    #[test]
    fn leaving_zone_goes_idle() {
        let (mut s, _, _) = scene();
        let mut t = ZoneTracker::new();
        let z = t.add_zone(Vec3::new(0.5, 0.5, 0.0), 0.3);
        t.check(&hand_at(0.5, 0.5, 0.0), &mut s);
        t.check(&hand_at(2.0, 2.0, 0.0), &mut s);
        let zone = t.zones().get(z).unwrap();
        assert!(!zone.active);
        assert_eq!(zone.opacity, IDLE_OPACITY);
    }

    #[test]
    fn repeated_hits_do_not_restart_pulse() {
        let (mut s, near, _) = scene();
        let mut t = ZoneTracker::new();
        t.add_zone(Vec3::new(0.5, 0.5, 0.0), 0.3);
        t.check(&hand_at(0.5, 0.5, 0.0), &mut s);
        s.get_mut(near).unwrap().tick(std::time::Duration::from_millis(100));
        let scale = s.get(near).unwrap().scale;
        t.check(&hand_at(0.5, 0.5, 0.0), &mut s);
        assert_eq!(s.get(near).unwrap().scale, scale);
        assert!(s.get(near).unwrap().is_animating());
    }
}
