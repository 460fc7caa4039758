//! Circuit breaker states and transitions.

use std::fmt::{self, Display, Formatter};

/// Represents the possible states of a circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Circuit is closed and operations are allowed.
    Closed,

    /// Circuit is open and operations are rejected until the wait duration elapses.
    Open,

    /// Circuit is letting trial calls through to decide whether to close again.
    HalfOpen,

    /// Breaker is switched off: every call is permitted and nothing is recorded.
    Disabled,

    /// Breaker is held open by an operator and never moves to half-open on its own.
    ForcedOpen,
}

impl State {
    /// Lower-case name of the state, as used in logs and errors.
    pub fn as_str(self) -> &'static str {
        match self {
            State::Closed => "closed",
            State::Open => "open",
            State::HalfOpen => "half-open",
            State::Disabled => "disabled",
            State::ForcedOpen => "forced-open",
        }
    }

    /// Whether outcomes reported in this state go into the window.
    pub(crate) fn records_outcomes(self) -> bool {
        matches!(self, State::Closed | State::HalfOpen)
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change from one state to another, as reported to hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    /// State before the change.
    pub from: State,

    /// State after the change.
    pub to: State,
}

impl Display for StateTransition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
