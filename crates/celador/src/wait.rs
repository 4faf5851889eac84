//! Bounded polling for asynchronous state.
//!
//! Test bodies wait for a session-exposed state change by polling an
//! operation until it yields a value or a deadline passes. Failures observed
//! during an attempt do not abort the poll: the most recent one is recorded
//! and only surfaced if the deadline arrives without a success, so flaky
//! intermediate reads stay diagnosable without failing the wait early.
//!
//! The poller blocks the calling thread between attempts and supports one
//! logical caller per invocation; there is no cancellation beyond the
//! timeout.

use crate::result::{CeladorError, CeladorResult};
use std::time::{Duration, Instant};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (5 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// POLLER IMPLEMENTATION
// =============================================================================

/// Bounded poller for condition-producing operations
#[derive(Debug, Clone, Default)]
pub struct Poller {
    options: WaitOptions,
}

impl Poller {
    /// Create a poller with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a poller with custom options
    #[must_use]
    pub const fn with_options(options: WaitOptions) -> Self {
        Self { options }
    }

    /// Poll `operation` until it produces a value or the deadline passes.
    ///
    /// - `Ok(Some(value))` ends the wait immediately with that value.
    /// - `Ok(None)` means "not yet"; the poller sleeps one interval and
    ///   retries.
    /// - `Err(failure)` is recorded as the last observed failure and polling
    ///   continues.
    ///
    /// The deadline is measured from the first attempt, and the operation is
    /// invoked at least once even with a zero timeout. On timeout the last
    /// recorded failure is returned when one exists, otherwise
    /// [`CeladorError::ConditionTimeout`] naming `description`.
    pub fn wait_for<T, F>(&self, description: &str, mut operation: F) -> CeladorResult<T>
    where
        F: FnMut() -> CeladorResult<Option<T>>,
    {
        let timeout = self.options.timeout();
        let poll_interval = self.options.poll_interval();
        let start = Instant::now();
        let mut last_failure: Option<CeladorError> = None;

        loop {
            match operation() {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => {}
                Err(failure) => last_failure = Some(failure),
            }

            if start.elapsed() >= timeout {
                return Err(match last_failure {
                    Some(failure) => failure,
                    None => CeladorError::ConditionTimeout {
                        ms: self.options.timeout_ms,
                        waiting_for: description.to_string(),
                    },
                });
            }
            std::thread::sleep(poll_interval);
        }
    }

    /// Poll a boolean predicate until it returns `true`
    pub fn wait_until<F>(&self, description: &str, mut predicate: F) -> CeladorResult<()>
    where
        F: FnMut() -> bool,
    {
        self.wait_for(description, || Ok(predicate().then_some(())))
    }
}

// =============================================================================
// CONVENIENCE FUNCTIONS
// =============================================================================

/// Wait for a predicate with an explicit timeout and the default interval
pub fn wait_until<F>(description: &str, predicate: F, timeout_ms: u64) -> CeladorResult<()>
where
    F: FnMut() -> bool,
{
    let poller = Poller::with_options(WaitOptions::new().with_timeout(timeout_ms));
    poller.wait_until(description, predicate)
}
