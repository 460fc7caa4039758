//! Hook registry for circuit breaker events.

use crate::state::StateTransition;
use parking_lot::RwLock;
use std::sync::Arc;

type HookFn = Arc<dyn Fn() + Send + Sync + 'static>;
type TransitionHookFn = Arc<dyn Fn(StateTransition) + Send + Sync + 'static>;

/// A registry for circuit breaker event hooks.
///
/// Hooks run on the calling thread after the breaker has released its lock, so a
/// hook may safely query the breaker it is attached to. Keep them short: they sit
/// on the caller's path.
pub struct HookRegistry {
    on_state_transition: RwLock<Option<TransitionHookFn>>,
    on_success: RwLock<Option<HookFn>>,
    on_failure: RwLock<Option<HookFn>>,
    on_ignored_error: RwLock<Option<HookFn>>,
    on_call_not_permitted: RwLock<Option<HookFn>>,
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HookRegistry {
    /// Creates a new empty hook registry.
    pub fn new() -> Self {
        Self {
            on_state_transition: RwLock::new(None),
            on_success: RwLock::new(None),
            on_failure: RwLock::new(None),
            on_ignored_error: RwLock::new(None),
            on_call_not_permitted: RwLock::new(None),
        }
    }

    /// Sets the hook to call whenever the breaker changes state.
    pub fn set_on_state_transition<F>(&self, f: F)
    where
        F: Fn(StateTransition) + Send + Sync + 'static,
    {
        *self.on_state_transition.write() = Some(Arc::new(f));
    }

    /// Sets the hook to call when a success is recorded.
    pub fn set_on_success<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.on_success.write() = Some(Arc::new(f));
    }

    /// Sets the hook to call when a failure is recorded.
    pub fn set_on_failure<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.on_failure.write() = Some(Arc::new(f));
    }

    /// Sets the hook to call when an error is excluded by the failure policy.
    pub fn set_on_ignored_error<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.on_ignored_error.write() = Some(Arc::new(f));
    }

    /// Sets the hook to call when the breaker rejects a call.
    pub fn set_on_call_not_permitted<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.on_call_not_permitted.write() = Some(Arc::new(f));
    }

    pub(crate) fn execute_state_transition_hook(&self, transition: StateTransition) {
        // Clone out of the lock so a hook can replace hooks without deadlocking.
        let hook = self.on_state_transition.read().clone();
        if let Some(hook) = hook {
            hook(transition);
        }
    }

    pub(crate) fn execute_success_hook(&self) {
        Self::run(&self.on_success);
    }

    pub(crate) fn execute_failure_hook(&self) {
        Self::run(&self.on_failure);
    }

    pub(crate) fn execute_ignored_error_hook(&self) {
        Self::run(&self.on_ignored_error);
    }

    pub(crate) fn execute_call_not_permitted_hook(&self) {
        Self::run(&self.on_call_not_permitted);
    }

    fn run(slot: &RwLock<Option<HookFn>>) {
        let hook = slot.read().clone();
        if let Some(hook) = hook {
            hook();
        }
    }
}
