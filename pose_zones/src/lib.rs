//! # pose_zones
//!
//! Interaction zones: spheres in pose space that light up when the right
//! wrist enters them and make nearby objects pulse.
//!
//! The tracker never touches a renderer.  It sees the scene only through
//! [`SceneObjects`], "something that owns positioned objects and can pulse
//! them by id".  [`ObjectRegistry<InteractiveObject>`] is the stock
//! implementation.
//!
//! ```rust
//! use pose_gesture::{Keypoint, Pose};
//! use pose_zones::{InteractiveObject, ObjectRegistry, Vec3, ZoneTracker};
//!
//! let mut boxes = ObjectRegistry::new();
//! let b = boxes.insert(InteractiveObject::new(Vec3::new(0.0, 0.0, 0.0), 0.2, 0xFF00FF00));
//!
//! let mut tracker = ZoneTracker::new();
//! let z = tracker.add_zone(Vec3::new(0.5, 0.5, 0.0), 0.3);
//!
//! let pose = Pose::from_keypoints(vec![Keypoint::new("right_wrist", 0.45, 0.5, 0.0)]);
//! assert_eq!(tracker.check(&pose, &mut boxes), vec![z]);
//! assert!(boxes.get(b).unwrap().is_animating());
//! ```

pub mod object;
pub mod registry;
pub mod tracker;
pub mod tween;
pub mod vec3;

pub use object::{InteractiveObject, PULSE_DURATION, PULSE_FACTOR};
pub use registry::{ObjectId, ObjectRegistry};
pub use tracker::{
    InteractionZone, SceneObjects, ZoneTracker,
    ACTIVE_OPACITY, DEFAULT_ZONE_RADIUS, IDLE_OPACITY, PULSE_RADIUS,
};
pub use tween::{Easing, Tween};
pub use vec3::Vec3;
