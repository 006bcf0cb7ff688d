//! The closed set of gestures and their predicates.
//!
//! Each predicate reads a few named joints; when any of them is missing the
//! predicate is simply `false`.  [`Gesture::ALL`] fixes the order in which the
//! classifier evaluates them.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::PoseError;
use crate::history::{GestureHistory, WAVE_WINDOW, WAVE_WINDOW_LEN};
use crate::keypoint::{Joint, Pose};

// ════════════════════════════════════════════════════════════════════════════
// Thresholds
// ════════════════════════════════════════════════════════════════════════════

/// Geometric thresholds, in normalized frame units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Knee-to-hip vertical gap below which the body counts as crouched.
    pub squat_gap:   f32,
    /// Maximum vertical difference for a wrist or shoulder pair to be level.
    pub level:       f32,
    /// Summed right-wrist travel above which the recent history is a wave.
    pub wave_travel: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            squat_gap:   0.2,
            level:       0.1,
            wave_travel: 0.5,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Gesture
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    RaisedHands,
    Squat,
    TPose,
    Wave,
}

impl Gesture {
    /// Evaluation order.
    pub const ALL: [Gesture; 4] = [
        Gesture::RaisedHands,
        Gesture::Squat,
        Gesture::TPose,
        Gesture::Wave,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Gesture::RaisedHands => "raised_hands",
            Gesture::Squat       => "squat",
            Gesture::TPose       => "t_pose",
            Gesture::Wave        => "wave",
        }
    }

    /// Joints the predicate reads.
    pub fn joints(self) -> &'static [Joint] {
        match self {
            Gesture::RaisedHands => &[Joint::LeftWrist, Joint::RightWrist, Joint::Nose],
            Gesture::Squat       => &[Joint::LeftKnee, Joint::RightKnee, Joint::LeftHip],
            Gesture::TPose       => &[
                Joint::LeftWrist, Joint::RightWrist,
                Joint::LeftShoulder, Joint::RightShoulder,
            ],
            Gesture::Wave        => &[Joint::RightWrist],
        }
    }

    /// Does `pose` show this gesture?  `history` and `now` only matter for
    /// [`Gesture::Wave`].
    pub fn matches(
        self,
        pose:       &Pose,
        history:    &GestureHistory,
        now:        Instant,
        thresholds: &Thresholds,
    ) -> bool {
        match self {
            Gesture::RaisedHands => raised_hands(pose),
            Gesture::Squat       => squat(pose, thresholds),
            Gesture::TPose       => t_pose(pose, thresholds),
            Gesture::Wave        => wave(pose, history, now, thresholds),
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Gesture {
    type Err = PoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gesture::ALL
            .iter()
            .copied()
            .find(|g| g.label() == s)
            .ok_or_else(|| PoseError::UnknownGesture(s.to_string()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Predicates
// ════════════════════════════════════════════════════════════════════════════

/// Both wrists above the nose.
pub fn raised_hands(pose: &Pose) -> bool {
    let (Some(lw), Some(rw), Some(nose)) = (
        pose.get(Joint::LeftWrist),
        pose.get(Joint::RightWrist),
        pose.get(Joint::Nose),
    ) else {
        return false;
    };
    lw.y < nose.y && rw.y < nose.y
}

/// Left knee close to the left hip vertically.  The right knee only has to
/// be present.
pub fn squat(pose: &Pose, t: &Thresholds) -> bool {
    let (Some(lk), Some(_rk), Some(lh)) = (
        pose.get(Joint::LeftKnee),
        pose.get(Joint::RightKnee),
        pose.get(Joint::LeftHip),
    ) else {
        return false;
    };
    (lk.y - lh.y).abs() < t.squat_gap
}

/// Wrists level with each other and shoulders level with each other.
/// Horizontal extension is not checked.
pub fn t_pose(pose: &Pose, t: &Thresholds) -> bool {
    let (Some(lw), Some(rw), Some(ls), Some(rs)) = (
        pose.get(Joint::LeftWrist),
        pose.get(Joint::RightWrist),
        pose.get(Joint::LeftShoulder),
        pose.get(Joint::RightShoulder),
    ) else {
        return false;
    };
    (lw.y - rw.y).abs() < t.level && (ls.y - rs.y).abs() < t.level
}

/// Summed distance between the current right-wrist height and the heights
/// recorded on recent history events.
pub fn wave(pose: &Pose, history: &GestureHistory, now: Instant, t: &Thresholds) -> bool {
    let Some(wrist) = pose.get(Joint::RightWrist) else {
        return false;
    };
    if history.is_empty() {
        return false;
    }
    let travel: f32 = history
        .recent(WAVE_WINDOW_LEN, WAVE_WINDOW, now)
        .filter_map(|e| e.wrist_y)
        .map(|y| (y - wrist.y).abs())
        .sum();
    travel > t.wave_travel
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::GestureEvent;
    use crate::keypoint::Keypoint;
    use std::time::Duration;

    fn pose(points: &[(Joint, f32)]) -> Pose {
        Pose::from_keypoints(points.iter().map(|&(j, y)| Keypoint::joint(j, 0.5, y, 0.0)))
    }

    #[test]
    fn labels_parse_back() {
        for g in Gesture::ALL {
            assert_eq!(g.label().parse::<Gesture>().unwrap(), g);
        }
        assert!("clap".parse::<Gesture>().is_err());
    }

    #[test]
    fn serde_uses_labels() {
        assert_eq!(serde_json::to_string(&Gesture::TPose).unwrap(), "\"t_pose\"");
        let g: Gesture = serde_json::from_str("\"raised_hands\"").unwrap();
        assert_eq!(g, Gesture::RaisedHands);
    }

    // ── raised_hands ─────────────────────────────────────────────────────

    #[test]
    fn raised_hands_both_above_nose() {
        let p = pose(&[(Joint::Nose, 0.5), (Joint::LeftWrist, 0.3), (Joint::RightWrist, 0.2)]);
        assert!(raised_hands(&p));
    }

    #[test]
    fn raised_hands_one_wrist_below() {
        let p = pose(&[(Joint::Nose, 0.5), (Joint::LeftWrist, 0.3), (Joint::RightWrist, 0.6)]);
        assert!(!raised_hands(&p));
    }

    #[test]
    fn raised_hands_needs_all_three_joints() {
        let full = [(Joint::Nose, 0.5), (Joint::LeftWrist, 0.3), (Joint::RightWrist, 0.2)];
        for skip in 0..full.len() {
            let partial: Vec<_> = full.iter().enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, p)| *p)
                .collect();
            assert!(!raised_hands(&pose(&partial)), "missing {:?}", full[skip].0);
        }
    }

    // ── squat ────────────────────────────────────────────────────────────

    #[test]
    fn squat_boundary_is_strict() {
        let t = Thresholds::default();
        let at = pose(&[(Joint::LeftHip, 0.0), (Joint::LeftKnee, 0.2), (Joint::RightKnee, 0.2)]);
        assert!(!squat(&at, &t));
        let under = pose(&[(Joint::LeftHip, 0.0), (Joint::LeftKnee, 0.199), (Joint::RightKnee, 0.2)]);
        assert!(squat(&under, &t));
        let wide = pose(&[(Joint::LeftHip, 0.5), (Joint::LeftKnee, 0.75), (Joint::RightKnee, 0.7)]);
        assert!(!squat(&wide, &t));
    }

    #[test]
    fn squat_requires_right_knee_present() {
        let p = pose(&[(Joint::LeftHip, 0.5), (Joint::LeftKnee, 0.55)]);
        assert!(!squat(&p, &Thresholds::default()));
    }

    // ── t_pose ───────────────────────────────────────────────────────────

    #[test]
    fn t_pose_both_pairs_level() {
        let p = pose(&[
            (Joint::LeftWrist, 0.40), (Joint::RightWrist, 0.42),
            (Joint::LeftShoulder, 0.38), (Joint::RightShoulder, 0.40),
        ]);
        assert!(t_pose(&p, &Thresholds::default()));
    }

    #[test]
    fn t_pose_only_one_pair_level() {
        let wrists_off = pose(&[
            (Joint::LeftWrist, 0.2), (Joint::RightWrist, 0.6),
            (Joint::LeftShoulder, 0.38), (Joint::RightShoulder, 0.40),
        ]);
        assert!(!t_pose(&wrists_off, &Thresholds::default()));

        let shoulders_off = pose(&[
            (Joint::LeftWrist, 0.40), (Joint::RightWrist, 0.42),
            (Joint::LeftShoulder, 0.2), (Joint::RightShoulder, 0.5),
        ]);
        assert!(!t_pose(&shoulders_off, &Thresholds::default()));
    }

    // ── wave ─────────────────────────────────────────────────────────────

    #[test]
    fn wave_false_with_empty_history() {
        let h = GestureHistory::default();
        for y in [0.0, 0.5, 1.0] {
            let p = pose(&[(Joint::RightWrist, y)]);
            assert!(!wave(&p, &h, Instant::now(), &Thresholds::default()));
        }
    }

    #[test]
    fn wave_sums_recent_wrist_travel() {
        let now = Instant::now();
        let mut h = GestureHistory::default();
        for y in [0.1, 0.9, 0.1] {
            h.push(GestureEvent { gesture: Gesture::TPose, timestamp: now, wrist_y: Some(y) });
        }
        // |0.1-0.5| + |0.9-0.5| + |0.1-0.5| = 1.2
        let p = pose(&[(Joint::RightWrist, 0.5)]);
        assert!(wave(&p, &h, now, &Thresholds::default()));
    }

    #[test]
    fn wave_ignores_entries_older_than_window() {
        let t0 = Instant::now();
        let mut h = GestureHistory::default();
        h.push(GestureEvent { gesture: Gesture::TPose, timestamp: t0, wrist_y: Some(1.0) });
        h.push(GestureEvent {
            gesture: Gesture::TPose,
            timestamp: t0 + Duration::from_millis(900),
            wrist_y: Some(0.3),
        });
        let p = pose(&[(Joint::RightWrist, 0.2)]);
        let now = t0 + Duration::from_millis(1100);
        // only the 0.3 entry is recent: travel 0.1
        assert!(!wave(&p, &h, now, &Thresholds::default()));
        // same history read earlier: 0.8 + 0.1
        assert!(wave(&p, &h, t0 + Duration::from_millis(950), &Thresholds::default()));
    }

    #[test]
    fn wave_skips_entries_without_wrist_height() {
        let now = Instant::now();
        let mut h = GestureHistory::default();
        for _ in 0..5 {
            h.push(GestureEvent { gesture: Gesture::Squat, timestamp: now, wrist_y: None });
        }
        let p = pose(&[(Joint::RightWrist, 0.9)]);
        assert!(!wave(&p, &h, now, &Thresholds::default()));
    }
}
