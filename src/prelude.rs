//! Re-exports the types most callers need.
//!
//! # Example
//! ```rust,no_run
//! use ringbreaker::prelude::*;
//!
//! let breaker = CircuitBreaker::<std::io::Error>::with_defaults("disk");
//! let _ = breaker.call(|| std::fs::read("/etc/hostname"));
//! ```

pub use crate::{
    decorate_function, decorate_supplier, BreakerConfig, BreakerError, BreakerResult,
    CallNotPermitted, CircuitBreaker, State,
};
