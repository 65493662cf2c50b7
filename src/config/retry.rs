// ABOUTME: Retry policy for strategy invocations.
// ABOUTME: Bounded attempts with a fixed backoff between failures.

use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::rollback::RollbackError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RetryPolicy {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: NonZeroU32,

    /// Fixed delay after each failed attempt except the last.
    #[serde(default = "default_backoff", with = "humantime_serde")]
    pub backoff: Duration,

    /// Overall budget for a rollback. Accepted and carried, but the engine
    /// does not enforce it; cancel through a `Cancellation` instead.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

fn default_max_attempts() -> NonZeroU32 {
    NonZeroU32::new(3).unwrap_or(NonZeroU32::MIN)
}

fn default_backoff() -> Duration {
    Duration::from_secs(5)
}

fn default_timeout() -> Option<Duration> {
    Some(Duration::from_secs(5 * 60))
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff: default_backoff(),
            timeout: default_timeout(),
        }
    }
}

impl RetryPolicy {
    /// # Errors
    ///
    /// `Configuration` error when `max_attempts` is zero.
    pub fn new(max_attempts: u32, backoff: Duration) -> Result<Self, RollbackError> {
        let max_attempts = NonZeroU32::new(max_attempts)
            .ok_or_else(|| RollbackError::configuration("max_attempts must be at least 1"))?;
        Ok(Self {
            max_attempts,
            backoff,
            ..Default::default()
        })
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.get()
    }
}
