//! Bounded gesture history.
//!
//! Every classification that matches at least one gesture appends a
//! [`GestureEvent`].  The history is a fixed-capacity ring: once full, the
//! oldest event is evicted on each push.  Readers see a count window (the last
//! `n` events) further narrowed by a recency window.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::gesture::Gesture;

/// Number of trailing events the wave heuristic inspects.
pub const WAVE_WINDOW_LEN: usize = 10;

/// Recency window the wave heuristic inspects.
pub const WAVE_WINDOW: Duration = Duration::from_millis(1000);

/// Default ring capacity.
pub const DEFAULT_CAPACITY: usize = 64;

/// One recognised gesture, stamped when it was recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub gesture:   Gesture,
    pub timestamp: Instant,
    /// Right-wrist height at the time of the event, when it was visible.
    pub wrist_y:   Option<f32>,
}

#[derive(Debug, Clone)]
pub struct GestureHistory {
    entries:  VecDeque<GestureEvent>,
    capacity: usize,
}

impl GestureHistory {
    /// Capacity never drops below [`WAVE_WINDOW_LEN`], so the wave window is
    /// always fully backed.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(WAVE_WINDOW_LEN);
        GestureHistory {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, event: GestureEvent) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(event);
    }

    /// The last `n` events, oldest first, keeping only those strictly newer
    /// than `now - window`.
    pub fn recent(
        &self,
        n: usize,
        window: Duration,
        now: Instant,
    ) -> impl Iterator<Item = &GestureEvent> + '_ {
        let skip = self.entries.len().saturating_sub(n);
        self.entries
            .iter()
            .skip(skip)
            .filter(move |e| now.saturating_duration_since(e.timestamp) < window)
    }

    pub fn last(&self) -> Option<&GestureEvent> { self.entries.back() }
    pub fn iter(&self) -> impl Iterator<Item = &GestureEvent> { self.entries.iter() }
    pub fn len(&self) -> usize                  { self.entries.len() }
    pub fn is_empty(&self) -> bool              { self.entries.is_empty() }
    pub fn capacity(&self) -> usize             { self.capacity }
}

impl Default for GestureHistory {
    fn default() -> Self {
        GestureHistory::with_capacity(DEFAULT_CAPACITY)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
