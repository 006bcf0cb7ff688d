//! Keyboard-driven stand-in for a pose estimator.
//!
//! The puppet is drawn mirror-style: the body's left side sits at smaller x,
//! and y grows downward.  Each stance is placed so the matching predicate
//! fires with default thresholds while the others stay quiet.

use pose_gesture::{Joint, Keypoint, Pose};

/// Confidence reported for every puppet keypoint.
const PUPPET_SCORE: f32 = 0.9;

/// Wrist travel per frame while an arrow key is held.
pub const HAND_STEP: f32 = 0.015;

/// Phase advance per frame while waving.
const WAVE_STEP: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stance {
    #[default]
    Neutral,
    RaisedHands,
    Squat,
    TPose,
}

#[derive(Debug, Clone)]
pub struct Puppet {
    stance:  Stance,
    waving:  bool,
    present: bool,
    phase:   f32,
    /// Offset added to the right wrist, steered with the arrow keys.
    hand:    (f32, f32),
}

impl Default for Puppet {
    fn default() -> Self {
        Puppet {
            stance:  Stance::Neutral,
            waving:  false,
            present: true,
            phase:   0.0,
            hand:    (0.0, 0.0),
        }
    }
}

impl Puppet {
    pub fn new() -> Self {
        Puppet::default()
    }

    pub fn stance(&self) -> Stance { self.stance }
    pub fn is_waving(&self) -> bool { self.waving }
    pub fn is_present(&self) -> bool { self.present }

    /// Switch to `stance`, or back to neutral if it is already held.
    pub fn toggle_stance(&mut self, stance: Stance) {
        self.stance = if self.stance == stance { Stance::Neutral } else { stance };
    }

    pub fn set_waving(&mut self, waving: bool) {
        self.waving = waving;
    }

    /// Step out of (or back into) the frame.
    pub fn toggle_present(&mut self) {
        self.present = !self.present;
    }

    pub fn move_hand(&mut self, dx: f32, dy: f32) {
        self.hand.0 = (self.hand.0 + dx).clamp(-0.6, 0.4);
        self.hand.1 = (self.hand.1 + dy).clamp(-0.7, 0.3);
    }

    /// Advance one frame of animation.
    pub fn step(&mut self) {
        if self.waving {
            self.phase += WAVE_STEP;
        }
    }

    /// The current pose, or `None` while the puppet is out of frame.
    pub fn pose(&self) -> Option<Pose> {
        if !self.present {
            return None;
        }
        let mut s = Skeleton::neutral();

        match self.stance {
            Stance::Neutral => {}
            Stance::RaisedHands => {
                s.set(Joint::LeftElbow,  0.40, 0.18);
                s.set(Joint::RightElbow, 0.60, 0.20);
                s.set(Joint::LeftWrist,  0.41, 0.04);
                s.set(Joint::RightWrist, 0.59, 0.16);
            }
            Stance::TPose => {
                s.set(Joint::LeftElbow,  0.30, 0.32);
                s.set(Joint::RightElbow, 0.70, 0.32);
                s.set(Joint::LeftWrist,  0.18, 0.32);
                s.set(Joint::RightWrist, 0.82, 0.32);
            }
            Stance::Squat => {
                for j in UPPER_BODY {
                    s.shift(j, 0.0, 0.14);
                }
                s.set(Joint::LeftHip,   0.43, 0.72);
                s.set(Joint::RightHip,  0.57, 0.72);
                s.set(Joint::LeftKnee,  0.36, 0.80);
                s.set(Joint::RightKnee, 0.64, 0.80);
            }
        }

        if self.waving {
            s.set(Joint::LeftElbow,  0.40, 0.18);
            s.set(Joint::LeftWrist,  0.41, 0.04);
            s.set(Joint::RightElbow, 0.62, 0.22);
            s.set(Joint::RightWrist, 0.64 + 0.03 * self.phase.cos(), 0.10 + 0.09 * self.phase.sin());
        }

        s.shift(Joint::RightWrist, self.hand.0, self.hand.1);
        Some(s.into_pose())
    }
}

const UPPER_BODY: [Joint; 11] = [
    Joint::Nose,
    Joint::LeftEye,
    Joint::RightEye,
    Joint::LeftEar,
    Joint::RightEar,
    Joint::LeftShoulder,
    Joint::RightShoulder,
    Joint::LeftElbow,
    Joint::RightElbow,
    Joint::LeftWrist,
    Joint::RightWrist,
];

/// Joint positions indexed by `Joint as usize`.
struct Skeleton([(f32, f32); Joint::COUNT]);

impl Skeleton {
    /// Standing, left hand on hip, right arm hanging.
    fn neutral() -> Self {
        let mut s = Skeleton([(0.0, 0.0); Joint::COUNT]);
        s.set(Joint::Nose,          0.50, 0.20);
        s.set(Joint::LeftEye,       0.48, 0.18);
        s.set(Joint::RightEye,      0.52, 0.18);
        s.set(Joint::LeftEar,       0.46, 0.19);
        s.set(Joint::RightEar,      0.54, 0.19);
        s.set(Joint::LeftShoulder,  0.42, 0.32);
        s.set(Joint::RightShoulder, 0.58, 0.32);
        s.set(Joint::LeftElbow,     0.37, 0.45);
        s.set(Joint::RightElbow,    0.61, 0.50);
        s.set(Joint::LeftWrist,     0.44, 0.56);
        s.set(Joint::RightWrist,    0.63, 0.68);
        s.set(Joint::LeftHip,       0.45, 0.58);
        s.set(Joint::RightHip,      0.55, 0.58);
        s.set(Joint::LeftKnee,      0.45, 0.80);
        s.set(Joint::RightKnee,     0.55, 0.80);
        s.set(Joint::LeftAnkle,     0.45, 0.95);
        s.set(Joint::RightAnkle,    0.55, 0.95);
        s
    }

    fn set(&mut self, joint: Joint, x: f32, y: f32) {
        self.0[joint as usize] = (x, y);
    }

    fn shift(&mut self, joint: Joint, dx: f32, dy: f32) {
        let (x, y) = self.0[joint as usize];
        self.0[joint as usize] = (x + dx, y + dy);
    }

    fn into_pose(self) -> Pose {
        Pose::from_keypoints(Joint::ALL.iter().map(|&j| {
            let (x, y) = self.0[j as usize];
            Keypoint::joint(j, x, y, 0.0).with_score(PUPPET_SCORE)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_gesture::{Gesture, GestureClassifier};
    use std::time::{Duration, Instant};

    fn classify(p: &Puppet) -> Vec<Gesture> {
        GestureClassifier::default().classify(&p.pose().unwrap())
    }

    #[test]
    fn neutral_matches_nothing() {
        assert!(classify(&Puppet::new()).is_empty());
    }

    #[test]
    fn each_stance_fires_its_gesture_first() {
        for (stance, gesture) in [
            (Stance::RaisedHands, Gesture::RaisedHands),
            (Stance::Squat,       Gesture::Squat),
            (Stance::TPose,       Gesture::TPose),
        ] {
            let mut p = Puppet::new();
            p.toggle_stance(stance);
            assert_eq!(classify(&p), vec![gesture], "{:?}", stance);
        }
    }

    #[test]
    fn toggle_twice_returns_to_neutral() {
        let mut p = Puppet::new();
        p.toggle_stance(Stance::Squat);
        p.toggle_stance(Stance::Squat);
        assert_eq!(p.stance(), Stance::Neutral);
    }

    #[test]
    fn absent_puppet_has_no_pose() {
        let mut p = Puppet::new();
        p.toggle_present();
        assert!(p.pose().is_none());
        p.toggle_present();
        assert_eq!(p.pose().unwrap().len(), Joint::COUNT);
    }

    #[test]
    fn hand_offset_moves_right_wrist_only() {
        let mut p = Puppet::new();
        let before = p.pose().unwrap();
        p.move_hand(0.1, -0.2);
        let after = p.pose().unwrap();
        let (b, a) = (before.get(Joint::RightWrist).unwrap(), after.get(Joint::RightWrist).unwrap());
        assert!((a.x - b.x - 0.1).abs() < 1e-5);
        assert!((a.y - b.y + 0.2).abs() < 1e-5);
        assert_eq!(before.get(Joint::LeftWrist), after.get(Joint::LeftWrist));
    }

    #[test]
    fn waving_is_recognised_within_a_second() {
        let mut p = Puppet::new();
        p.set_waving(true);
        let mut c = GestureClassifier::default();
        let t0 = Instant::now();

        let waved = (0..30).any(|i| {
            p.step();
            let now = t0 + Duration::from_millis(33 * i);
            c.classify_at(&p.pose().unwrap(), now).contains(&Gesture::Wave)
        });
        assert!(waved);
    }
}
