//! # pose_gesture
//!
//! Named body keypoints, per-frame poses, and a small gesture classifier.
//!
//! ## Gestures
//!
//! | Label | Holds when |
//! |---|---|
//! | `raised_hands` | both wrists above the nose |
//! | `squat` | left knee within 0.2 of the left hip vertically |
//! | `t_pose` | wrists level within 0.1 and shoulders level within 0.1 |
//! | `wave` | recent history shows more than 0.5 of right-wrist travel |
//!
//! Coordinates are normalized with a top-left origin, so a smaller `y` is
//! higher in the frame.
//!
//! ## Quick start
//!
//! ```rust
//! use pose_gesture::{GestureClassifier, Gesture, Keypoint, Pose};
//!
//! let pose = Pose::from_keypoints(vec![
//!     Keypoint::new("nose",        0.5, 0.5, 0.0),
//!     Keypoint::new("left_wrist",  0.4, 0.3, 0.0),
//!     Keypoint::new("right_wrist", 0.6, 0.2, 0.0),
//! ]);
//!
//! let mut classifier = GestureClassifier::default();
//! let found = classifier.classify(&pose);
//! assert_eq!(found, vec![Gesture::RaisedHands]);
//! assert_eq!(classifier.last_gesture(), Some(Gesture::RaisedHands));
//! ```

pub mod classifier;
pub mod error;
pub mod gesture;
pub mod history;
pub mod keypoint;

pub use classifier::GestureClassifier;
pub use error::{PoseError, Result};
pub use gesture::{Gesture, Thresholds};
pub use history::{GestureEvent, GestureHistory, WAVE_WINDOW, WAVE_WINDOW_LEN};
pub use keypoint::{Joint, Keypoint, Pose};
