//! Bounded retry of mutating calls on edit-lock conflicts.
//!
//! The upstream serialises admin edits behind an organisation-wide lock and
//! rejects writes with `EDIT_LOCK_NOT_AVAILABLE` while another session holds
//! it. This is the only failure retried anywhere in the runtime: a fixed
//! number of attempts, a fixed pause, no backoff and no jitter.
//!
//! The wrapped operation may run up to `max_attempts` times and must be safe
//! to repeat.

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Default maximum number of attempts (including the first).
pub const DEFAULT_CONFLICT_MAX_ATTEMPTS: u32 = 5;

/// Default pause between attempts in milliseconds.
pub const DEFAULT_CONFLICT_INTERVAL_MS: u64 = 1000;

/// Immutable retry policy for one logical mutating call.
#[derive(Debug, Clone, Copy)]
pub struct ConflictRetryPolicy {
    /// Maximum number of invocations of the operation
    pub max_attempts: u32,

    /// Fixed pause between invocations
    pub interval: Duration,

    /// Which errors are worth another attempt
    pub is_retryable: fn(&Error) -> bool,
}

impl ConflictRetryPolicy {
    /// Five attempts, one second apart, retrying only edit-lock conflicts.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_attempts: DEFAULT_CONFLICT_MAX_ATTEMPTS,
            interval: Duration::from_millis(DEFAULT_CONFLICT_INTERVAL_MS),
            is_retryable: Error::is_edit_lock_conflict,
        }
    }

    /// A policy that runs the operation exactly once.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self::new().with_max_attempts(1)
    }

    /// Set the maximum number of attempts.
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the pause between attempts.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Replace the retryable-error predicate.
    #[must_use]
    pub const fn with_predicate(mut self, is_retryable: fn(&Error) -> bool) -> Self {
        self.is_retryable = is_retryable;
        self
    }

    /// Check if retries are enabled.
    #[must_use]
    pub const fn has_retries(&self) -> bool {
        self.max_attempts > 1
    }

    /// Run `operation` under this policy.
    ///
    /// # Errors
    ///
    /// See [`retry_on_conflict`].
    pub async fn run<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        retry_on_conflict(self, operation).await
    }
}

impl Default for ConflictRetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `operation`, retrying while it fails with a retryable error.
///
/// A `max_attempts` of zero is treated as one.
///
/// # Errors
///
/// Returns the first non-retryable error immediately, or the last retryable
/// error once `max_attempts` invocations have failed.
pub async fn retry_on_conflict<T, F, Fut>(
    policy: &ConflictRetryPolicy,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt: u32 = 1;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !(policy.is_retryable)(&err) {
            return Err(err);
        }

        if attempt >= max_attempts {
            warn!(attempts = attempt, error = %err, "edit lock still unavailable, giving up");
            return Err(err);
        }

        debug!(attempt, delay = ?policy.interval, "edit lock unavailable, retrying");
        if !policy.interval.is_zero() {
            sleep(policy.interval).await;
        }
        attempt += 1;
    }
}
