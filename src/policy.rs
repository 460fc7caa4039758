//! Classification of operation errors into recorded failures and ignored errors.

/// Decides whether an error raised by the guarded operation counts as a failure.
///
/// Errors for which [`is_failure`](FailurePolicy::is_failure) returns false are
/// ignored entirely: they are still returned to the caller, but they never enter
/// the outcome window and never cause a state transition.
///
/// Any `Fn(&E) -> bool` closure is a policy:
///
/// ```rust
/// use ringbreaker::BreakerConfig;
/// use std::io;
///
/// let config = BreakerConfig::<io::Error>::builder()
///     .record_failures_of(|e: &io::Error| e.kind() != io::ErrorKind::NotFound)
///     .build()
///     .unwrap();
/// ```
pub trait FailurePolicy<E>: Send + Sync {
    /// Returns true if `error` should be recorded as a failure.
    fn is_failure(&self, error: &E) -> bool;
}

impl<E, F> FailurePolicy<E> for F
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn is_failure(&self, error: &E) -> bool {
        self(error)
    }
}

/// Counts every error as a failure. Used when no policy is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordAll;

impl<E> FailurePolicy<E> for RecordAll {
    fn is_failure(&self, _error: &E) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BreakerConfig, CircuitBreaker, State};

    #[derive(Debug)]
    enum Fault {
        Timeout,
        BadRequest,
    }

    #[test]
    fn closures_classify() {
        let policy = |e: &Fault| matches!(e, Fault::Timeout);
        assert!(policy.is_failure(&Fault::Timeout));
        assert!(!policy.is_failure(&Fault::BadRequest));
    }

    struct OnlyTimeouts;

    impl FailurePolicy<Fault> for OnlyTimeouts {
        fn is_failure(&self, error: &Fault) -> bool {
            matches!(error, Fault::Timeout)
        }
    }

    #[test]
    fn named_policy_drives_a_breaker() {
        let config = BreakerConfig::<Fault>::builder()
            .closed_window_size(1)
            .record_failures_of(OnlyTimeouts)
            .build()
            .unwrap();
        assert!(config.is_failure(&Fault::Timeout));

        let breaker = CircuitBreaker::with_config("policy", config);
        breaker.call(|| Err::<(), _>(Fault::BadRequest)).unwrap_err();
        assert_eq!(breaker.state(), State::Closed);
        breaker.call(|| Err::<(), _>(Fault::Timeout)).unwrap_err();
        assert_eq!(breaker.state(), State::Open);
    }

    #[test]
    fn record_all_counts_everything() {
        assert!(FailurePolicy::<Fault>::is_failure(&RecordAll, &Fault::BadRequest));
    }
}
