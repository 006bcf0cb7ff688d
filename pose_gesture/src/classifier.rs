//! Per-frame gesture classification.
//!
//! [`GestureClassifier`] owns the history and the last recognised gesture.
//! Poses are classified independently except for the wave heuristic, which
//! reads the history as it stood before the current call.

use std::time::Instant;

use tracing::debug;

use crate::gesture::{Gesture, Thresholds};
use crate::history::{GestureEvent, GestureHistory};
use crate::keypoint::{Joint, Pose};

#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    history:      GestureHistory,
    last_gesture: Option<Gesture>,
    thresholds:   Thresholds,
}

impl GestureClassifier {
    pub fn new(history_capacity: usize, thresholds: Thresholds) -> Self {
        GestureClassifier {
            history: GestureHistory::with_capacity(history_capacity),
            last_gesture: None,
            thresholds,
        }
    }

    pub fn classify(&mut self, pose: &Pose) -> Vec<Gesture> {
        self.classify_at(pose, Instant::now())
    }

    /// Every gesture whose predicate holds, in [`Gesture::ALL`] order.
    ///
    /// When anything matched, one event is appended for the first match only
    /// and it becomes the last gesture.  Identical poses classified back to
    /// back append one event each.
    pub fn classify_at(&mut self, pose: &Pose, now: Instant) -> Vec<Gesture> {
        let found: Vec<Gesture> = Gesture::ALL
            .iter()
            .copied()
            .filter(|g| g.matches(pose, &self.history, now, &self.thresholds))
            .collect();

        if let Some(&first) = found.first() {
            self.last_gesture = Some(first);
            self.history.push(GestureEvent {
                gesture:   first,
                timestamp: now,
                wrist_y:   pose.get(Joint::RightWrist).map(|k| k.y),
            });
            debug!(gesture = %first, matched = found.len(), "gesture recognised");
        }

        found
    }

    pub fn last_gesture(&self) -> Option<Gesture> { self.last_gesture }
    pub fn history(&self) -> &GestureHistory      { &self.history }
    pub fn thresholds(&self) -> &Thresholds       { &self.thresholds }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
