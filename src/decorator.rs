//! Call guards that bind an operation to a circuit breaker.
//!
//! A decorated operation carries its own handle to the breaker, so it can be
//! stored, cloned and called from any thread. All state stays in the breaker:
//! guards built over the same breaker see each other's transitions.

use std::fmt;

use crate::breaker::CircuitBreaker;
use crate::error::BreakerResult;

/// Wraps a zero-argument operation with `breaker`.
///
/// ```rust
/// use ringbreaker::{decorate_supplier, CircuitBreaker};
///
/// let breaker = CircuitBreaker::<String>::with_defaults("inventory");
/// let fetch = decorate_supplier(&breaker, || Ok::<_, String>(42));
/// assert_eq!(fetch.call().unwrap(), 42);
/// ```
pub fn decorate_supplier<F, T, E>(breaker: &CircuitBreaker<E>, op: F) -> DecoratedSupplier<F, E>
where
    F: Fn() -> Result<T, E>,
{
    DecoratedSupplier {
        breaker: breaker.clone(),
        op,
    }
}

/// Wraps a one-argument operation with `breaker`.
pub fn decorate_function<F, A, T, E>(
    breaker: &CircuitBreaker<E>,
    op: F,
) -> DecoratedFunction<F, E>
where
    F: Fn(A) -> Result<T, E>,
{
    DecoratedFunction {
        breaker: breaker.clone(),
        op,
    }
}

/// A zero-argument operation guarded by a circuit breaker.
pub struct DecoratedSupplier<F, E> {
    breaker: CircuitBreaker<E>,
    op: F,
}

impl<F, T, E> DecoratedSupplier<F, E>
where
    F: Fn() -> Result<T, E>,
{
    /// Runs the operation if the breaker permits it.
    pub fn call(&self) -> BreakerResult<T, E> {
        self.breaker.call(&self.op)
    }
}

impl<F, E> DecoratedSupplier<F, E> {
    /// The breaker guarding this operation.
    pub fn breaker(&self) -> &CircuitBreaker<E> {
        &self.breaker
    }
}

/// A one-argument operation guarded by a circuit breaker.
pub struct DecoratedFunction<F, E> {
    breaker: CircuitBreaker<E>,
    op: F,
}

impl<F, E> DecoratedFunction<F, E> {
    /// Runs the operation on `arg` if the breaker permits it.
    ///
    /// `arg` is dropped without being used when the call is rejected.
    pub fn apply<A, T>(&self, arg: A) -> BreakerResult<T, E>
    where
        F: Fn(A) -> Result<T, E>,
    {
        self.breaker.call_with(&self.op, arg)
    }

    /// The breaker guarding this operation.
    pub fn breaker(&self) -> &CircuitBreaker<E> {
        &self.breaker
    }
}

impl<F: Clone, E> Clone for DecoratedSupplier<F, E> {
    fn clone(&self) -> Self {
        Self {
            breaker: self.breaker.clone(),
            op: self.op.clone(),
        }
    }
}

impl<F: Clone, E> Clone for DecoratedFunction<F, E> {
    fn clone(&self) -> Self {
        Self {
            breaker: self.breaker.clone(),
            op: self.op.clone(),
        }
    }
}

impl<F, E> fmt::Debug for DecoratedSupplier<F, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratedSupplier")
            .field("breaker", &self.breaker.name())
            .finish_non_exhaustive()
    }
}

impl<F, E> fmt::Debug for DecoratedFunction<F, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratedFunction")
            .field("breaker", &self.breaker.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BreakerConfig;
    use crate::state::State;
    use std::cell::Cell;

    #[test]
    fn supplier_returns_value() {
        let breaker = CircuitBreaker::<String>::with_defaults("backend");
        let supplier = decorate_supplier(&breaker, || Ok::<_, String>("1".to_string()));
        assert_eq!(supplier.call().unwrap(), "1");
        assert_eq!(breaker.metrics().buffered_calls, 1);
    }

    #[test]
    fn function_passes_error_through() {
        let breaker = CircuitBreaker::<String>::with_defaults("backend");
        let calls = Cell::new(0);
        let get = decorate_function(&breaker, |id: u64| {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                Ok(id)
            } else {
                Err(format!("lookup {id} failed"))
            }
        });

        assert_eq!(get.apply(1).unwrap(), 1);
        let err = get.apply(2).unwrap_err();
        assert_eq!(err.to_string(), "lookup 2 failed");
        assert_eq!(err.into_operation().as_deref(), Some("lookup 2 failed"));
    }

    #[test]
    fn guards_share_breaker_state() {
        let config = BreakerConfig::<String>::builder()
            .closed_window_size(2)
            .build()
            .unwrap();
        let breaker = CircuitBreaker::with_config("shared", config);

        let failing = decorate_supplier(&breaker, || Err::<(), _>("down".to_string()));
        let healthy = decorate_supplier(&breaker, || Ok::<_, String>(()));

        failing.call().unwrap_err();
        failing.call().unwrap_err();
        assert_eq!(healthy.breaker().state(), State::Open);
        assert!(healthy.call().unwrap_err().is_not_permitted());
    }
}
