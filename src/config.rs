//! Configuration for circuit breakers.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ConfigError;
use crate::policy::{FailurePolicy, RecordAll};

const DEFAULT_CLOSED_WINDOW_SIZE: usize = 100;
const DEFAULT_HALF_OPEN_WINDOW_SIZE: usize = 10;
const DEFAULT_FAILURE_RATE_THRESHOLD: f64 = 50.0;
const DEFAULT_WAIT_DURATION_IN_OPEN_STATE: Duration = Duration::from_secs(60);

/// Immutable settings of a circuit breaker.
///
/// Built once through [`BreakerConfig::builder`] and shared by reference
/// afterwards; cloning is cheap.
pub struct BreakerConfig<E> {
    closed_window_size: usize,
    half_open_window_size: usize,
    failure_rate_threshold: f64,
    wait_duration_in_open_state: Duration,
    failure_policy: Arc<dyn FailurePolicy<E>>,
}

impl<E: 'static> BreakerConfig<E> {
    /// Creates a new builder with default settings.
    pub fn builder() -> BreakerConfigBuilder<E> {
        BreakerConfigBuilder::new()
    }
}

impl<E> BreakerConfig<E> {
    /// Number of outcomes evaluated while closed.
    pub fn closed_window_size(&self) -> usize {
        self.closed_window_size
    }

    /// Number of trial outcomes evaluated while half-open.
    pub fn half_open_window_size(&self) -> usize {
        self.half_open_window_size
    }

    /// Failure percentage at or above which the breaker opens.
    pub fn failure_rate_threshold(&self) -> f64 {
        self.failure_rate_threshold
    }

    /// How long the breaker stays open before permitting trial calls.
    pub fn wait_duration_in_open_state(&self) -> Duration {
        self.wait_duration_in_open_state
    }

    /// Returns true if `error` counts toward the failure rate.
    pub fn is_failure(&self, error: &E) -> bool {
        self.failure_policy.is_failure(error)
    }
}

impl<E: 'static> Default for BreakerConfig<E> {
    fn default() -> Self {
        Self {
            closed_window_size: DEFAULT_CLOSED_WINDOW_SIZE,
            half_open_window_size: DEFAULT_HALF_OPEN_WINDOW_SIZE,
            failure_rate_threshold: DEFAULT_FAILURE_RATE_THRESHOLD,
            wait_duration_in_open_state: DEFAULT_WAIT_DURATION_IN_OPEN_STATE,
            failure_policy: Arc::new(RecordAll),
        }
    }
}

impl<E> Clone for BreakerConfig<E> {
    fn clone(&self) -> Self {
        Self {
            closed_window_size: self.closed_window_size,
            half_open_window_size: self.half_open_window_size,
            failure_rate_threshold: self.failure_rate_threshold,
            wait_duration_in_open_state: self.wait_duration_in_open_state,
            failure_policy: Arc::clone(&self.failure_policy),
        }
    }
}

impl<E> fmt::Debug for BreakerConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreakerConfig")
            .field("closed_window_size", &self.closed_window_size)
            .field("half_open_window_size", &self.half_open_window_size)
            .field("failure_rate_threshold", &self.failure_rate_threshold)
            .field("wait_duration_in_open_state", &self.wait_duration_in_open_state)
            .finish_non_exhaustive()
    }
}

/// Builder for [`BreakerConfig`].
pub struct BreakerConfigBuilder<E> {
    closed_window_size: usize,
    half_open_window_size: usize,
    failure_rate_threshold: f64,
    wait_duration_in_open_state: Duration,
    failure_policy: Arc<dyn FailurePolicy<E>>,
}

impl<E: 'static> Default for BreakerConfigBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> BreakerConfigBuilder<E> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        let defaults = BreakerConfig::<E>::default();
        Self {
            closed_window_size: defaults.closed_window_size,
            half_open_window_size: defaults.half_open_window_size,
            failure_rate_threshold: defaults.failure_rate_threshold,
            wait_duration_in_open_state: defaults.wait_duration_in_open_state,
            failure_policy: defaults.failure_policy,
        }
    }

    /// Sets the policy deciding which errors count as failures.
    ///
    /// Errors the policy rejects are passed back to the caller but never recorded.
    pub fn record_failures_of<P: FailurePolicy<E> + 'static>(mut self, policy: P) -> Self {
        self.failure_policy = Arc::new(policy);
        self
    }

    /// Sets the number of outcomes evaluated while closed.
    pub fn closed_window_size(mut self, size: usize) -> Self {
        self.closed_window_size = size;
        self
    }

    /// Sets the number of trial outcomes evaluated while half-open.
    pub fn half_open_window_size(mut self, size: usize) -> Self {
        self.half_open_window_size = size;
        self
    }

    /// Sets the failure percentage, in `(0, 100]`, that trips the breaker.
    pub fn failure_rate_threshold(mut self, percent: f64) -> Self {
        self.failure_rate_threshold = percent;
        self
    }

    /// Sets how long the breaker stays open before permitting trial calls.
    pub fn wait_duration_in_open_state(mut self, duration: Duration) -> Self {
        self.wait_duration_in_open_state = duration;
        self
    }

    /// Validates the settings and builds the configuration.
    pub fn build(self) -> Result<BreakerConfig<E>, ConfigError> {
        if self.closed_window_size == 0 {
            return Err(ConfigError::ZeroWindowSize { which: "closed" });
        }
        if self.half_open_window_size == 0 {
            return Err(ConfigError::ZeroWindowSize { which: "half-open" });
        }
        // NaN fails both comparisons and is rejected here too.
        if !(self.failure_rate_threshold > 0.0 && self.failure_rate_threshold <= 100.0) {
            return Err(ConfigError::InvalidThreshold(self.failure_rate_threshold));
        }

        Ok(BreakerConfig {
            closed_window_size: self.closed_window_size,
            half_open_window_size: self.half_open_window_size,
            failure_rate_threshold: self.failure_rate_threshold,
            wait_duration_in_open_state: self.wait_duration_in_open_state,
            failure_policy: self.failure_policy,
        })
    }
}
