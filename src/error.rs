//! Error types for the circuit breaker library.

use thiserror::Error;

use crate::state::State;

/// Result type for calls made through a circuit breaker.
pub type BreakerResult<T, E> = Result<T, BreakerError<E>>;

/// Error returned by a guarded call.
///
/// The two variants never overlap: `NotPermitted` is produced only by the
/// breaker, and `Operation` only ever carries the wrapped operation's own error.
#[derive(Debug, Error)]
pub enum BreakerError<E> {
    /// The breaker rejected the call; the operation was not invoked.
    #[error(transparent)]
    NotPermitted(#[from] CallNotPermitted),

    /// The operation ran and failed. The error is passed through untouched.
    #[error(transparent)]
    Operation(E),
}

impl<E> BreakerError<E> {
    /// Returns true if the breaker itself rejected the call.
    pub fn is_not_permitted(&self) -> bool {
        matches!(self, BreakerError::NotPermitted(_))
    }

    /// Returns the operation's error, if the operation ran.
    pub fn into_operation(self) -> Option<E> {
        match self {
            BreakerError::Operation(e) => Some(e),
            BreakerError::NotPermitted(_) => None,
        }
    }

    /// Borrows the operation's error, if the operation ran.
    pub fn operation(&self) -> Option<&E> {
        match self {
            BreakerError::Operation(e) => Some(e),
            BreakerError::NotPermitted(_) => None,
        }
    }
}

/// A call was rejected because the breaker does not permit calls right now.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("circuit breaker '{name}' is {state} and does not permit further calls")]
pub struct CallNotPermitted {
    name: String,
    state: State,
}

impl CallNotPermitted {
    pub(crate) fn new(name: impl Into<String>, state: State) -> Self {
        Self {
            name: name.into(),
            state,
        }
    }

    /// Name of the breaker that rejected the call.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// State the breaker was in when it rejected the call.
    pub fn state(&self) -> State {
        self.state
    }
}

/// Invalid configuration detected by [`BreakerConfigBuilder::build`](crate::BreakerConfigBuilder::build).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A window size was zero.
    #[error("{which} window size must be greater than zero")]
    ZeroWindowSize {
        /// Which window was misconfigured (`closed` or `half-open`).
        which: &'static str,
    },

    /// The failure rate threshold was not in `(0, 100]`.
    #[error("failure rate threshold must be in (0, 100], got {0}")]
    InvalidThreshold(f64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn operation_error_is_transparent() {
        let err: BreakerError<io::Error> =
            BreakerError::Operation(io::Error::new(io::ErrorKind::Other, "backend down"));
        assert_eq!(err.to_string(), "backend down");
        assert!(!err.is_not_permitted());
        assert_eq!(err.into_operation().unwrap().kind(), io::ErrorKind::Other);
    }

    #[test]
    fn not_permitted_names_the_breaker() {
        let err: BreakerError<io::Error> =
            CallNotPermitted::new("payments", State::Open).into();
        assert!(err.is_not_permitted());
        assert!(err.operation().is_none());
        assert_eq!(
            err.to_string(),
            "circuit breaker 'payments' is open and does not permit further calls"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn config_error_messages() {
        assert_eq!(
            ConfigError::ZeroWindowSize { which: "closed" }.to_string(),
            "closed window size must be greater than zero"
        );
        assert_eq!(
            ConfigError::InvalidThreshold(120.0).to_string(),
            "failure rate threshold must be in (0, 100], got 120"
        );
    }
}
