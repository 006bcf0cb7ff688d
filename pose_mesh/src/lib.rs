//! # pose_mesh
//!
//! A skeleton stage driven by pose keypoints.  Each frame the poses are
//! classified into body gestures, the right wrist is hit-tested against the
//! interaction zones, and recognised gestures can be logged to a ledger.
//!
//! ## Gesture → Reaction mapping
//!
//! | Gesture | Detected when | Reaction |
//! |---|---|---|
//! | `raised_hands` | Both wrists above the nose | Feedback ring, ledger record |
//! | `squat` | Left knee within 0.2 of the left hip vertically | Feedback ring, ledger record |
//! | `t_pose` | Wrists level and shoulders level | Feedback ring, ledger record |
//! | `wave` | Right wrist travelled far from recent recorded heights | Feedback ring, ledger record |
//! | (any) | Right wrist inside a zone | Zone brightens, nearby boxes pulse |
//!
//! ## Keypoint sources
//!
//! * `sim` (default): a keyboard-driven puppet.
//! * `jsonl`: one JSON document per line, a pose `{"keypoints": [...]}` or an
//!   array of them, from a file or stdin.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Puppet |
//! |---|---|
//! | `H` | Raise hands (toggle) |
//! | `C` | Squat (toggle) |
//! | `T` | T-pose (toggle) |
//! | `W` / hold | Wave |
//! | Arrows / hold | Move the right hand |
//! | `N` | Step out of / back into frame |
//! | `Q`, `Escape` | Quit |
//!
//! ## Feature flags
//!
//! * (default): the `pose_mesh` stage binary.
//! * `serve`: also builds `asset_server`, a static file host for the web
//!   front end.

pub mod config;
pub mod puppet;
pub mod source;
pub mod scene;
pub mod visualizer;
pub mod app;
