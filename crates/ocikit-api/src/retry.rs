//! Retry policies applied to individual operation calls.
//!
//! A policy only decides *whether* and *when* to retry a failed attempt; the
//! client owns the loop. Retry policies are distinct from the waiter backoff
//! in `ocikit-core`, which paces polls of a resource that answered fine.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Error;

/// Decides whether a failed attempt should be retried.
pub trait RetryPolicy: Send + Sync + fmt::Debug {
    /// Returns the delay before the next attempt, or `None` to give up.
    ///
    /// # Parameters
    /// * `attempt` - number of attempts made so far (starts at 1).
    /// * `elapsed` - time since the first attempt was sent.
    /// * `error` - the failure of the latest attempt.
    fn retry_delay(&self, attempt: u32, elapsed: Duration, error: &Error) -> Option<Duration>;

    /// Whether this policy can ever retry.
    ///
    /// Mutating operations only generate an idempotency token when it can.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Shared handle to a retry policy, cloned into every client.
pub type SharedRetryPolicy = Arc<dyn RetryPolicy>;

/// Never retries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetry;

impl RetryPolicy for NoRetry {
    fn retry_delay(&self, _attempt: u32, _elapsed: Duration, _error: &Error) -> Option<Duration> {
        None
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Truncated exponential backoff over transient errors.
///
/// The delay after attempt `n` is `base * 2^(n-1)`, capped at `max_delay`.
/// A longer `retry-after` from the service wins over the computed delay.
/// Gives up after `max_attempts` attempts or once `max_elapsed` has passed.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub max_elapsed: Duration,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_elapsed: Duration::from_secs(600),
        }
    }
}

impl ExponentialBackoff {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1_u32 << exp)
            .min(self.max_delay)
    }
}

impl RetryPolicy for ExponentialBackoff {
    fn retry_delay(&self, attempt: u32, elapsed: Duration, error: &Error) -> Option<Duration> {
        if attempt >= self.max_attempts || !error.is_transient() {
            return None;
        }
        let delay = match error.retry_after() {
            Some(asked) => asked.max(self.delay_for(attempt)),
            None => self.delay_for(attempt),
        };
        if elapsed.saturating_add(delay) > self.max_elapsed {
            return None;
        }
        Some(delay)
    }

    fn is_enabled(&self) -> bool {
        self.max_attempts > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn throttled() -> Error {
        Error::Service {
            status: 429,
            code: Some("TooManyRequests".into()),
            message: "slow down".into(),
            opc_request_id: None,
            retry_after: None,
        }
    }

    fn not_found() -> Error {
        Error::Service {
            status: 404,
            code: Some("NotAuthorizedOrNotFound".into()),
            message: "gone".into(),
            opc_request_id: None,
            retry_after: None,
        }
    }

    #[test]
    fn no_retry_never_retries() {
        assert_eq!(NoRetry.retry_delay(1, Duration::ZERO, &throttled()), None);
        assert!(!NoRetry.is_enabled());
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = ExponentialBackoff::default();
        let zero = Duration::ZERO;
        assert_eq!(
            policy.retry_delay(1, zero, &throttled()),
            Some(Duration::from_secs(1))
        );
        assert_eq!(
            policy.retry_delay(2, zero, &throttled()),
            Some(Duration::from_secs(2))
        );
        assert_eq!(
            policy.retry_delay(3, zero, &throttled()),
            Some(Duration::from_secs(4))
        );
        assert_eq!(
            policy.retry_delay(7, zero, &throttled()),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn backoff_stops_at_max_attempts_and_elapsed() {
        let policy = ExponentialBackoff::default().with_max_attempts(3);
        assert!(policy.retry_delay(2, Duration::ZERO, &throttled()).is_some());
        assert_eq!(policy.retry_delay(3, Duration::ZERO, &throttled()), None);
        assert_eq!(
            policy.retry_delay(1, Duration::from_secs(600), &throttled()),
            None
        );
    }

    #[test]
    fn backoff_skips_permanent_errors() {
        let policy = ExponentialBackoff::default();
        assert_eq!(policy.retry_delay(1, Duration::ZERO, &not_found()), None);
    }

    #[test]
    fn server_retry_after_stretches_the_delay() {
        let policy = ExponentialBackoff::default().with_base_delay(Duration::from_millis(5));
        let mut err = throttled();
        if let Error::Service { retry_after, .. } = &mut err {
            *retry_after = Some(Duration::from_secs(2));
        }
        assert_eq!(
            policy.retry_delay(1, Duration::ZERO, &err),
            Some(Duration::from_secs(2))
        );
        // Still bounded by the elapsed budget
        assert_eq!(policy.retry_delay(1, Duration::from_secs(599), &err), None);
        // Never shortens the computed backoff
        let slow = ExponentialBackoff::default().with_base_delay(Duration::from_secs(10));
        assert_eq!(
            slow.retry_delay(1, Duration::ZERO, &err),
            Some(Duration::from_secs(10))
        );
    }

    #[test]
    fn single_attempt_backoff_is_disabled() {
        assert!(!ExponentialBackoff::default().with_max_attempts(1).is_enabled());
    }
}
