//! Keypoints and poses.
//!
//! A [`Keypoint`] is identified by its name string; a [`Pose`] holds at most
//! one keypoint per name, in the order the provider first reported them.
//! [`Joint`] names the landmarks the classifier and the stage know about, but
//! keypoints with other names (e.g. the extra BlazePose landmarks) are kept.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PoseError;

// ════════════════════════════════════════════════════════════════════════════
// Joint — the named landmarks we look up by name
// ════════════════════════════════════════════════════════════════════════════

/// The 17 COCO-style body landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joint {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    pub const COUNT: usize = 17;

    pub const ALL: [Joint; Joint::COUNT] = [
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
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
    ];

    /// Keypoint name as reported by pose providers.
    pub fn as_str(self) -> &'static str {
        match self {
            Joint::Nose          => "nose",
            Joint::LeftEye       => "left_eye",
            Joint::RightEye      => "right_eye",
            Joint::LeftEar       => "left_ear",
            Joint::RightEar      => "right_ear",
            Joint::LeftShoulder  => "left_shoulder",
            Joint::RightShoulder => "right_shoulder",
            Joint::LeftElbow     => "left_elbow",
            Joint::RightElbow    => "right_elbow",
            Joint::LeftWrist     => "left_wrist",
            Joint::RightWrist    => "right_wrist",
            Joint::LeftHip       => "left_hip",
            Joint::RightHip      => "right_hip",
            Joint::LeftKnee      => "left_knee",
            Joint::RightKnee     => "right_knee",
            Joint::LeftAnkle     => "left_ankle",
            Joint::RightAnkle    => "right_ankle",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Joint {
    type Err = PoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Joint::ALL
            .iter()
            .copied()
            .find(|j| j.as_str() == s)
            .ok_or_else(|| PoseError::UnknownJoint(s.to_string()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Keypoint
// ════════════════════════════════════════════════════════════════════════════

/// A single named landmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name:  String,
    pub x:     f32,
    pub y:     f32,
    #[serde(default)]
    pub z:     f32,
    /// Detector confidence (0.0–1.0), when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl Keypoint {
    pub fn new(name: impl Into<String>, x: f32, y: f32, z: f32) -> Self {
        Keypoint { name: name.into(), x, y, z, score: None }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    /// Shorthand for a keypoint named after a known joint.
    pub fn joint(joint: Joint, x: f32, y: f32, z: f32) -> Self {
        Keypoint::new(joint.as_str(), x, y, z)
    }

    /// The joint this keypoint names, if it is one of the known 17.
    pub fn as_joint(&self) -> Option<Joint> {
        self.name.parse().ok()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Pose
// ════════════════════════════════════════════════════════════════════════════

#[derive(Deserialize, Serialize)]
struct RawPose {
    keypoints: Vec<Keypoint>,
}

/// All keypoints for one detected body in one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPose", into = "RawPose")]
pub struct Pose {
    keypoints: Vec<Keypoint>,
}

impl From<RawPose> for Pose {
    fn from(raw: RawPose) -> Self {
        Pose::from_keypoints(raw.keypoints)
    }
}

impl From<Pose> for RawPose {
    fn from(pose: Pose) -> Self {
        RawPose { keypoints: pose.keypoints }
    }
}

impl Pose {
    pub fn new() -> Self {
        Pose::default()
    }

    /// Build a pose, collapsing repeated names onto the first slot.
    pub fn from_keypoints<I>(keypoints: I) -> Self
    where
        I: IntoIterator<Item = Keypoint>,
    {
        let mut pose = Pose::new();
        for kp in keypoints {
            pose.insert(kp);
        }
        pose
    }

    /// Insert a keypoint, replacing any existing keypoint with the same name
    /// in place.
    pub fn insert(&mut self, keypoint: Keypoint) {
        match self.keypoints.iter_mut().find(|k| k.name == keypoint.name) {
            Some(slot) => *slot = keypoint,
            None       => self.keypoints.push(keypoint),
        }
    }

    pub fn get(&self, joint: Joint) -> Option<&Keypoint> {
        self.get_named(joint.as_str())
    }

    pub fn get_named(&self, name: &str) -> Option<&Keypoint> {
        self.keypoints.iter().find(|k| k.name == name)
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    /// The first keypoint the provider reported (anchor for feedback effects).
    pub fn first(&self) -> Option<&Keypoint> {
        self.keypoints.first()
    }

    pub fn len(&self) -> usize      { self.keypoints.len() }
    pub fn is_empty(&self) -> bool  { self.keypoints.is_empty() }

    /// Mean confidence over `joints`.
    ///
    /// Keypoints without a score count as fully confident; missing joints are
    /// skipped.  Returns 1.0 when none of the joints are present.
    pub fn mean_score(&self, joints: &[Joint]) -> f32 {
        let scores: Vec<f32> = joints
            .iter()
            .filter_map(|&j| self.get(j))
            .map(|k| k.score.unwrap_or(1.0))
            .collect();
        if scores.is_empty() {
            return 1.0;
        }
        scores.iter().sum::<f32>() / scores.len() as f32
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
