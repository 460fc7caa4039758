//! # ringbreaker
//!
//! A count-based circuit breaker: it records the outcomes of the calls it
//! guards in a fixed-size ring, and once enough of the most recent calls have
//! failed it stops letting calls through for a while, so callers fail fast
//! instead of piling up on a dead dependency.
//!
//! ## States
//!
//! - **Closed**: Normal operation. Outcomes go into a window of
//!   `closed_window_size` calls. When the window is full and its failure rate
//!   reaches `failure_rate_threshold`, the breaker opens.
//! - **Open**: Calls are rejected with [`CallNotPermitted`] without running the
//!   operation. The first permission request after
//!   `wait_duration_in_open_state` moves the breaker to half-open.
//! - **Half-Open**: Trial calls fill a window of `half_open_window_size`. Once it
//!   is full the breaker closes if the failure rate is below the threshold, and
//!   opens again otherwise.
//!
//! `Disabled` and `ForcedOpen` are administrative overrides entered only through
//! [`CircuitBreaker::transition_to_disabled`] and
//! [`CircuitBreaker::transition_to_forced_open`].
//!
//! ## Basic Usage
//!
//! ```rust
//! use ringbreaker::{decorate_function, BreakerConfig, BreakerError, CircuitBreaker, State};
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! enum ServiceError {
//!     Unavailable,
//!     NotFound,
//! }
//!
//! let config = BreakerConfig::<ServiceError>::builder()
//!     .closed_window_size(4)
//!     .failure_rate_threshold(50.0)
//!     .wait_duration_in_open_state(Duration::from_secs(30))
//!     // a missing record is the caller's problem, not the backend's
//!     .record_failures_of(|e: &ServiceError| matches!(e, ServiceError::Unavailable))
//!     .build()
//!     .expect("valid config");
//!
//! let breaker = CircuitBreaker::with_config("person-service", config);
//! let get_person = decorate_function(&breaker, |id: u64| -> Result<String, ServiceError> {
//!     if id == 0 {
//!         Err(ServiceError::NotFound)
//!     } else {
//!         Ok(format!("person-{id}"))
//!     }
//! });
//!
//! assert_eq!(get_person.apply(1).unwrap(), "person-1");
//! match get_person.apply(0) {
//!     Err(BreakerError::Operation(ServiceError::NotFound)) => {}
//!     other => panic!("unexpected: {other:?}"),
//! }
//! assert_eq!(breaker.state(), State::Closed);
//! ```
//!
//! ## Logging
//!
//! State transitions are logged at `info` through [`tracing`]; rejected calls
//! and ignored errors at `debug`; every recorded outcome at `trace`. The library
//! never installs a subscriber.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod breaker;
mod config;
mod decorator;
mod error;
mod hook;
mod metrics;
mod policy;
pub mod prelude;
mod state;
mod window;

// Re-exports
pub use breaker::CircuitBreaker;
pub use config::{BreakerConfig, BreakerConfigBuilder};
pub use decorator::{decorate_function, decorate_supplier, DecoratedFunction, DecoratedSupplier};
pub use error::{BreakerError, BreakerResult, CallNotPermitted, ConfigError};
pub use hook::HookRegistry;
pub use metrics::BreakerMetrics;
pub use policy::{FailurePolicy, RecordAll};
pub use state::{State, StateTransition};
pub use window::{Outcome, OutcomeWindow};
