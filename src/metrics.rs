//! Read-only snapshot of a breaker's counters.

use crate::state::State;

/// Point-in-time view of a circuit breaker, taken under its lock.
///
/// The window figures describe the window of the state the breaker was in when
/// the snapshot was taken. While open, forced open or disabled there is no
/// window and they read zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakerMetrics {
    /// State at the time of the snapshot.
    pub state: State,

    /// Failure percentage of the current window, once it is full.
    pub failure_rate: Option<f64>,

    /// Outcomes held in the current window.
    pub buffered_calls: usize,

    /// Failures held in the current window.
    pub failed_calls: usize,

    /// Capacity of the current window.
    pub window_capacity: usize,

    /// Calls rejected since the breaker was created or last [`reset`](crate::CircuitBreaker::reset).
    pub not_permitted_calls: u64,
}

impl BreakerMetrics {
    /// Successes held in the current window.
    pub fn successful_calls(&self) -> usize {
        self.buffered_calls - self.failed_calls
    }
}
