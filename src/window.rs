//! Count-based sliding window of call outcomes.

use smallvec::SmallVec;

/// The result of a single recorded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The call completed normally.
    Success,

    /// The call failed with an error the failure policy counts.
    Failure,
}

/// A fixed-capacity ring of the most recent call outcomes.
///
/// The window only produces a failure rate once it has seen `capacity`
/// outcomes. After that every new outcome overwrites the oldest slot, so the
/// window stays full and the rate always covers the last `capacity` calls.
#[derive(Debug, Clone)]
pub struct OutcomeWindow {
    slots: SmallVec<[Outcome; 16]>,
    capacity: usize,
    head: usize,
    failures: usize,
}

impl OutcomeWindow {
    /// Creates an empty window holding up to `capacity` outcomes.
    ///
    /// `capacity` must be non-zero; [`BreakerConfig`](crate::BreakerConfig)
    /// rejects zero sizes before a window is ever built.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "window capacity must be non-zero");
        Self {
            slots: SmallVec::with_capacity(capacity),
            capacity,
            head: 0,
            failures: 0,
        }
    }

    /// Records an outcome, overwriting the oldest one once the window is full.
    pub fn record(&mut self, outcome: Outcome) {
        if self.slots.len() < self.capacity {
            self.slots.push(outcome);
        } else {
            let evicted = std::mem::replace(&mut self.slots[self.head], outcome);
            if evicted == Outcome::Failure {
                self.failures -= 1;
            }
            self.head = (self.head + 1) % self.capacity;
        }

        if outcome == Outcome::Failure {
            self.failures += 1;
        }
    }

    /// Returns true once `capacity` outcomes have been recorded.
    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Failure percentage over the window, or `None` while it is still filling.
    pub fn failure_rate(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }

        Some(self.failures as f64 * 100.0 / self.capacity as f64)
    }

    /// Number of outcomes currently held.
    pub fn filled(&self) -> usize {
        self.slots.len()
    }

    /// Number of failures currently held.
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Maximum number of outcomes the window holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
