//! What gets written for each gesture.

use chrono::{DateTime, Utc};
use pose_gesture::Gesture;
use serde::{Deserialize, Serialize};

/// A gesture handed to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureRecord {
    /// Gesture label, e.g. `"t_pose"`.
    pub name:  String,
    pub score: f32,
}

impl GestureRecord {
    pub fn new(gesture: Gesture, score: f32) -> Self {
        GestureRecord { name: gesture.label().to_string(), score }
    }
}

/// The off-chain document uploaded to the content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureMetadata {
    pub gesture:   String,
    /// Unix time in milliseconds.
    pub timestamp: i64,
    pub score:     f32,
}

impl GestureMetadata {
    pub fn from_record(record: &GestureRecord, at: DateTime<Utc>) -> Self {
        GestureMetadata {
            gesture:   record.name.clone(),
            timestamp: at.timestamp_millis(),
            score:     record.score,
        }
    }
}
