//! Bounded retry for dependencies that become ready asynchronously.
//!
//! This is the only place in the orchestrator where a failing action is
//! retried. The retry decision is a pure function of the attempt number and
//! outcome ([`RetryPolicy::decide`]); the wait goes through an injected
//! [`Sleeper`].

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::port::Sleeper;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// What to do after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    Done,
    RetryAfter(Duration),
    GiveUp,
}

/// Attempt budget and spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_INTERVAL)
    }
}

impl RetryPolicy {
    /// A policy making at most `max_attempts` attempts (at least one).
    #[must_use]
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Decide what follows attempt number `attempt` (1-based).
    #[must_use]
    pub fn decide(&self, attempt: u32, succeeded: bool) -> PollDecision {
        if succeeded {
            PollDecision::Done
        } else if attempt >= self.max_attempts {
            PollDecision::GiveUp
        } else {
            PollDecision::RetryAfter(self.interval)
        }
    }
}

/// Runs an action until it succeeds or the policy gives up.
#[derive(Debug, Clone)]
pub struct ReadinessPoller<S> {
    policy: RetryPolicy,
    sleeper: S,
}

impl<S: Sleeper> ReadinessPoller<S> {
    pub fn new(policy: RetryPolicy, sleeper: S) -> Self {
        Self { policy, sleeper }
    }

    #[must_use]
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Invoke `action` (given the 1-based attempt number) until it succeeds.
    ///
    /// Every failure counts as "not ready yet".
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExhaustedRetries`] with the last failure once the
    /// attempt budget is spent.
    pub fn poll<T, F>(&self, operation: &str, mut action: F) -> Result<T>
    where
        F: FnMut(u32) -> Result<T>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let error = match action(attempt) {
                Ok(value) => {
                    debug!(operation, attempt, "Ready");
                    return Ok(value);
                }
                Err(e) => e,
            };

            match self.policy.decide(attempt, false) {
                PollDecision::RetryAfter(wait) => {
                    debug!(operation, attempt, error = %error, "Not ready yet");
                    self.sleeper.sleep(wait);
                }
                PollDecision::GiveUp | PollDecision::Done => {
                    warn!(operation, attempts = attempt, error = %error, "Gave up waiting");
                    return Err(Error::ExhaustedRetries {
                        operation: operation.to_string(),
                        attempts: attempt,
                        last_error: error.to_string(),
                    });
                }
            }
        }
    }
}
