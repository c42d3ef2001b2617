// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retry policy value type.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use verisend_core::VerisendError;

use crate::classify::default_retry_predicate;

/// Classification callback: `true` means the error is worth another attempt.
pub type RetryPredicate = Arc<dyn Fn(&VerisendError) -> bool + Send + Sync>;

/// Hook invoked before each backoff sleep with the upcoming attempt number
/// (1-based) and the error that triggered it.
pub type RetryHook = Arc<dyn Fn(u32, &VerisendError) + Send + Sync>;

/// Everything the retry engine needs to know about one class of operation.
///
/// Cloning is cheap; the callbacks are shared, not copied.
#[derive(Clone)]
pub struct RetryPolicy {
    /// Additional attempts after the first. Zero means exactly one attempt.
    pub max_retries: u32,
    /// Delay before the first re-attempt.
    pub initial_delay: Duration,
    /// Ceiling for the grown delay.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each failed attempt. Values at
    /// or below 1.0 keep the delay constant.
    pub backoff_factor: f64,
    /// Budget for a single attempt; the attempt future is dropped on expiry.
    pub timeout: Duration,
    /// Bounded wait for connectivity before each attempt.
    pub network_wait: Duration,
    /// Poll interval while waiting for connectivity.
    pub network_poll: Duration,
    /// Decides whether a given failure is worth another attempt.
    pub retry_on: RetryPredicate,
    /// Optional observability hook fired before each backoff sleep.
    pub on_retry: Option<RetryHook>,
}

impl RetryPolicy {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_network_wait(mut self, wait: Duration) -> Self {
        self.network_wait = wait;
        self
    }

    pub fn with_network_poll(mut self, poll: Duration) -> Self {
        self.network_poll = poll;
        self
    }

    pub fn with_retry_on(
        mut self,
        predicate: impl Fn(&VerisendError) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.retry_on = Arc::new(predicate);
        self
    }

    pub fn with_on_retry(
        mut self,
        hook: impl Fn(u32, &VerisendError) + Send + Sync + 'static,
    ) -> Self {
        self.on_retry = Some(Arc::new(hook));
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            backoff_factor: 2.0,
            timeout: Duration::from_millis(30_000),
            network_wait: Duration::from_millis(10_000),
            network_poll: Duration::from_millis(500),
            retry_on: Arc::new(default_retry_predicate),
            on_retry: None,
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("initial_delay", &self.initial_delay)
            .field("max_delay", &self.max_delay)
            .field("backoff_factor", &self.backoff_factor)
            .field("timeout", &self.timeout)
            .field("network_wait", &self.network_wait)
            .field("network_poll", &self.network_poll)
            .field("on_retry", &self.on_retry.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.initial_delay, Duration::from_secs(1));
        assert_eq!(policy.max_delay, Duration::from_secs(10));
        assert_eq!(policy.backoff_factor, 2.0);
        assert_eq!(policy.timeout, Duration::from_secs(30));
        assert_eq!(policy.network_wait, Duration::from_secs(10));
        assert_eq!(policy.network_poll, Duration::from_millis(500));
        assert!(policy.on_retry.is_none());
    }

    #[test]
    fn builders_replace_fields() {
        let policy = RetryPolicy::default()
            .with_max_retries(5)
            .with_initial_delay(Duration::from_millis(100))
            .with_backoff_factor(1.0)
            .with_retry_on(|_| false);
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.initial_delay, Duration::from_millis(100));
        assert!(!(policy.retry_on)(&VerisendError::NoNetwork));
    }

    #[test]
    fn clones_share_callbacks() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let counter = Arc::new(AtomicUsize::new(0));
        let hook_counter = counter.clone();
        let policy = RetryPolicy::default().with_on_retry(move |_, _| {
            hook_counter.fetch_add(1, Ordering::SeqCst);
        });
        let clone = policy.clone();
        (clone.on_retry.as_ref().unwrap())(1, &VerisendError::NoNetwork);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
