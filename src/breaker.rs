//! Core circuit breaker implementation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::{debug, info, trace};

use crate::config::BreakerConfig;
use crate::error::{BreakerError, BreakerResult, CallNotPermitted};
use crate::hook::HookRegistry;
use crate::metrics::BreakerMetrics;
use crate::state::{State, StateTransition};
use crate::window::{Outcome, OutcomeWindow};

/// State, window and open timestamp. Always read and written together under one
/// lock so a transition and its window swap are never seen half-applied.
struct Core {
    state: State,
    // Some exactly while Closed or HalfOpen.
    window: Option<OutcomeWindow>,
    // Some exactly while Open.
    opened_at: Option<Instant>,
}

impl Core {
    fn closed<E>(config: &BreakerConfig<E>) -> Self {
        Self {
            state: State::Closed,
            window: Some(OutcomeWindow::new(config.closed_window_size())),
            opened_at: None,
        }
    }

    fn move_to<E>(&mut self, to: State, config: &BreakerConfig<E>) -> StateTransition {
        let from = self.state;
        self.state = to;
        self.window = match to {
            State::Closed => Some(OutcomeWindow::new(config.closed_window_size())),
            State::HalfOpen => Some(OutcomeWindow::new(config.half_open_window_size())),
            State::Open | State::ForcedOpen | State::Disabled => None,
        };
        self.opened_at = (to == State::Open).then(Instant::now);

        StateTransition { from, to }
    }
}

/// Inner state of the circuit breaker, shared between clones.
struct BreakerInner<E> {
    name: String,
    config: BreakerConfig<E>,
    core: Mutex<Core>,
    not_permitted: AtomicU64,
    hooks: Arc<HookRegistry>,
}

/// A circuit breaker guarding calls to one dependency.
///
/// Cloning is cheap and yields a handle to the same breaker; separately
/// constructed breakers never share state.
pub struct CircuitBreaker<E> {
    inner: Arc<BreakerInner<E>>,
}

impl<E: 'static> CircuitBreaker<E> {
    /// Creates a breaker with the default configuration.
    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self::with_config(name, BreakerConfig::default())
    }

    /// Creates a breaker with the given configuration.
    pub fn with_config(name: impl Into<String>, config: BreakerConfig<E>) -> Self {
        Self::with_hooks(name, config, HookRegistry::new())
    }

    /// Creates a breaker with the given configuration and pre-registered hooks.
    pub fn with_hooks(
        name: impl Into<String>,
        config: BreakerConfig<E>,
        hooks: HookRegistry,
    ) -> Self {
        let inner = BreakerInner {
            name: name.into(),
            core: Mutex::new(Core::closed(&config)),
            config,
            not_permitted: AtomicU64::new(0),
            hooks: Arc::new(hooks),
        };

        Self {
            inner: Arc::new(inner),
        }
    }
}

impl<E> CircuitBreaker<E> {
    /// Name given at construction.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Configuration the breaker was built with.
    pub fn config(&self) -> &BreakerConfig<E> {
        &self.inner.config
    }

    /// Hooks attached to this breaker. Hooks may be replaced at any time.
    pub fn hooks(&self) -> &HookRegistry {
        &self.inner.hooks
    }

    /// Gets the current state of the circuit breaker.
    ///
    /// This does not perform the lazy open to half-open check; a breaker whose
    /// wait has elapsed still reports `Open` until the next permission request.
    pub fn state(&self) -> State {
        self.inner.core.lock().state
    }

    /// Takes a snapshot of the breaker's counters.
    pub fn metrics(&self) -> BreakerMetrics {
        let core = self.inner.core.lock();
        let (failure_rate, buffered_calls, failed_calls, window_capacity) = match &core.window {
            Some(window) => (
                window.failure_rate(),
                window.filled(),
                window.failures(),
                window.capacity(),
            ),
            None => (None, 0, 0, 0),
        };

        BreakerMetrics {
            state: core.state,
            failure_rate,
            buffered_calls,
            failed_calls,
            window_capacity,
            not_permitted_calls: self.inner.not_permitted.load(Ordering::Relaxed),
        }
    }

    /// Asks whether a call may proceed right now.
    ///
    /// An open breaker whose wait duration has elapsed moves to half-open here and
    /// permits the call. Half-open permits every call; the half-open window only
    /// bounds how many completed outcomes are evaluated.
    pub fn try_acquire_permission(&self) -> Result<(), CallNotPermitted> {
        let mut core = self.inner.core.lock();
        let state = core.state;
        let transition = match state {
            State::Closed | State::HalfOpen | State::Disabled => None,
            State::Open if self.wait_elapsed(&core) => {
                Some(core.move_to(State::HalfOpen, &self.inner.config))
            }
            rejected @ (State::Open | State::ForcedOpen) => {
                drop(core);
                return Err(self.reject(rejected));
            }
        };
        drop(core);

        if let Some(transition) = transition {
            self.notify(transition);
        }

        Ok(())
    }

    /// Records a successful call.
    pub fn on_success(&self) {
        self.record(Outcome::Success);
    }

    /// Records a failed call, unless the failure policy ignores `error`.
    pub fn on_error(&self, error: &E) {
        if self.inner.config.is_failure(error) {
            self.record(Outcome::Failure);
        } else {
            debug!(breaker = %self.inner.name, "error ignored by failure policy");
            self.inner.hooks.execute_ignored_error_hook();
        }
    }

    /// Executes a function wrapped by the circuit breaker.
    ///
    /// The function is not invoked if the breaker rejects the call. Otherwise its
    /// error, if any, is recorded and handed back unchanged in
    /// [`BreakerError::Operation`].
    pub fn call<F, T>(&self, f: F) -> BreakerResult<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.try_acquire_permission()?;

        match f() {
            Ok(value) => {
                self.on_success();
                Ok(value)
            }
            Err(err) => {
                self.on_error(&err);
                Err(BreakerError::Operation(err))
            }
        }
    }

    /// Executes a one-argument function wrapped by the circuit breaker.
    pub fn call_with<F, A, T>(&self, f: F, arg: A) -> BreakerResult<T, E>
    where
        F: FnOnce(A) -> Result<T, E>,
    {
        self.call(move || f(arg))
    }

    /// Moves the breaker to closed with an empty window.
    ///
    /// Returns false if it was already closed.
    pub fn transition_to_closed(&self) -> bool {
        self.force(State::Closed)
    }

    /// Moves the breaker to open and starts the wait timer.
    ///
    /// Returns false if it was already open.
    pub fn transition_to_open(&self) -> bool {
        self.force(State::Open)
    }

    /// Holds the breaker open until another administrative transition.
    ///
    /// Returns false if it was already forced open.
    pub fn transition_to_forced_open(&self) -> bool {
        self.force(State::ForcedOpen)
    }

    /// Disables the breaker: every call is permitted and nothing is recorded.
    ///
    /// Returns false if it was already disabled.
    pub fn transition_to_disabled(&self) -> bool {
        self.force(State::Disabled)
    }

    /// Returns the breaker to its initial state and clears the rejected-call count.
    pub fn reset(&self) {
        let transition = {
            let mut core = self.inner.core.lock();
            let transition = core.move_to(State::Closed, &self.inner.config);
            self.inner.not_permitted.store(0, Ordering::Relaxed);
            transition
        };

        if transition.from != transition.to {
            self.notify(transition);
        }
    }

    fn force(&self, to: State) -> bool {
        let transition = {
            let mut core = self.inner.core.lock();
            if core.state == to {
                return false;
            }
            core.move_to(to, &self.inner.config)
        };

        self.notify(transition);
        true
    }

    fn wait_elapsed(&self, core: &Core) -> bool {
        core.opened_at.map_or(true, |opened_at| {
            opened_at.elapsed() >= self.inner.config.wait_duration_in_open_state()
        })
    }

    fn reject(&self, state: State) -> CallNotPermitted {
        self.inner.not_permitted.fetch_add(1, Ordering::Relaxed);
        debug!(breaker = %self.inner.name, state = %state, "call not permitted");
        self.inner.hooks.execute_call_not_permitted_hook();

        CallNotPermitted::new(self.inner.name.as_str(), state)
    }

    fn record(&self, outcome: Outcome) {
        let transition = {
            let mut core = self.inner.core.lock();
            let state = core.state;
            // Outcomes of calls that started before the breaker opened or was
            // disabled have no window to land in.
            if !state.records_outcomes() {
                return;
            }
            let Some(window) = core.window.as_mut() else {
                return;
            };

            window.record(outcome);
            trace!(
                breaker = %self.inner.name,
                ?outcome,
                buffered = window.filled(),
                failures = window.failures(),
                "outcome recorded"
            );

            let threshold = self.inner.config.failure_rate_threshold();
            match window.failure_rate() {
                Some(rate) if rate >= threshold => {
                    Some(core.move_to(State::Open, &self.inner.config))
                }
                Some(_) if state == State::HalfOpen => {
                    Some(core.move_to(State::Closed, &self.inner.config))
                }
                _ => None,
            }
        };

        match outcome {
            Outcome::Success => self.inner.hooks.execute_success_hook(),
            Outcome::Failure => self.inner.hooks.execute_failure_hook(),
        }

        if let Some(transition) = transition {
            self.notify(transition);
        }
    }

    fn notify(&self, transition: StateTransition) {
        info!(
            breaker = %self.inner.name,
            from = %transition.from,
            to = %transition.to,
            "circuit breaker state changed"
        );
        self.inner.hooks.execute_state_transition_hook(transition);
    }
}

// Allow cloning of circuit breakers - cheap because inner state is Arc'd
impl<E> Clone for CircuitBreaker<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> fmt::Debug for CircuitBreaker<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.inner.name)
            .field("state", &self.state())
            .field("config", &self.inner.config)
            .finish()
    }
}
