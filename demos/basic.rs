use ringbreaker::{decorate_function, BreakerConfig, BreakerError, CircuitBreaker, HookRegistry};
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// Custom error type that implements Error trait
#[derive(Debug)]
enum ServiceError {
    Unavailable,
    NotFound(u64),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Unavailable => write!(f, "person service unavailable"),
            ServiceError::NotFound(id) => write!(f, "person {} not found", id),
        }
    }
}

impl Error for ServiceError {}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BreakerConfig::<ServiceError>::builder()
        .closed_window_size(4) // Evaluate the last 4 calls
        .half_open_window_size(2) // Decide recovery after 2 trial calls
        .failure_rate_threshold(50.0) // 50% failure rate will trip circuit
        .wait_duration_in_open_state(Duration::from_secs(1))
        // Missing people are the caller's problem, not the backend's
        .record_failures_of(|e: &ServiceError| matches!(e, ServiceError::Unavailable))
        .build()
        .expect("valid breaker config");

    let hooks = HookRegistry::new();
    hooks.set_on_state_transition(|t| println!("  [hook] state changed: {}", t));
    hooks.set_on_call_not_permitted(|| println!("  [hook] call rejected"));

    let breaker = CircuitBreaker::with_hooks("person-service", config, hooks);
    println!("Circuit initial state: {}", breaker.state());

    // The backend is down for the first 6 calls, then recovers
    let calls = AtomicU32::new(0);
    let get_person = decorate_function(&breaker, |id: u64| {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        if id == 0 {
            Err(ServiceError::NotFound(id))
        } else if n < 6 {
            Err(ServiceError::Unavailable)
        } else {
            Ok(format!("person-{}", id))
        }
    });

    for id in [0, 1, 2, 3, 4, 5, 6] {
        match get_person.apply(id) {
            Ok(person) => println!("Call {}: got {}", id, person),
            Err(BreakerError::NotPermitted(rejection)) => println!("Call {}: {}", id, rejection),
            Err(BreakerError::Operation(err)) => println!("Call {}: failed: {}", id, err),
        }
        println!("  state: {}", breaker.state());
    }

    println!("Waiting for the open state to expire...");
    thread::sleep(Duration::from_millis(1100));

    for id in [7, 8, 9] {
        match get_person.apply(id) {
            Ok(person) => println!("Call {}: got {}", id, person),
            Err(err) => println!("Call {}: {}", id, err),
        }
        println!("  state: {}", breaker.state());
    }

    let metrics = breaker.metrics();
    println!(
        "Final: state={}, buffered={}, failed={}, rejected={}",
        metrics.state, metrics.buffered_calls, metrics.failed_calls, metrics.not_permitted_calls
    );
}
