// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Network-gated retry loop.
//!
//! [`RetryExecutor::execute`] runs an async operation under a [`RetryPolicy`]:
//! each attempt is gated on connectivity, raced against the per-attempt
//! timeout, and classified on failure. Delays grow exponentially up to the
//! policy ceiling.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use verisend_core::{NetworkProbe, VerisendError};

use crate::policy::RetryPolicy;
use crate::scheduler::Scheduler;

/// Generic retry engine over an injected network probe.
///
/// The executor owns no timers and no state of its own; everything temporal
/// flows through the [`Scheduler`] so cancellation reaches every suspension
/// point.
pub struct RetryExecutor {
    probe: Arc<dyn NetworkProbe>,
}

impl RetryExecutor {
    pub fn new(probe: Arc<dyn NetworkProbe>) -> Self {
        Self { probe }
    }

    /// Runs `operation` under `policy`.
    ///
    /// `operation` is called once per attempt and must produce a fresh
    /// future each time. A timed-out attempt's future is dropped, which
    /// cancels whatever it was doing. On exhaustion the error from the final
    /// attempt is returned unchanged.
    pub async fn execute<T, F, Fut>(
        &self,
        scheduler: &Scheduler,
        policy: &RetryPolicy,
        operation: F,
    ) -> Result<T, VerisendError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, VerisendError>>,
    {
        let mut delay = policy.initial_delay;
        let mut attempt: u32 = 0;

        loop {
            if scheduler.is_cancelled() {
                return Err(VerisendError::Cancelled);
            }

            let error = match self.attempt_once(scheduler, policy, &operation).await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(attempts = attempt + 1, "operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            if matches!(error, VerisendError::Cancelled) {
                return Err(error);
            }
            if !(policy.retry_on)(&error) {
                debug!(error = %error, "failure classified non-retryable");
                return Err(error);
            }
            if attempt >= policy.max_retries {
                warn!(attempts = attempt + 1, error = %error, "retry budget exhausted");
                return Err(error);
            }

            attempt += 1;
            if let Some(hook) = &policy.on_retry {
                hook(attempt, &error);
            }
            warn!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "attempt failed, backing off"
            );
            scheduler.sleep(delay).await?;
            if policy.backoff_factor > 1.0 {
                delay = delay.mul_f64(policy.backoff_factor).min(policy.max_delay);
            }
        }
    }

    /// One attempt: connectivity gate, then the operation raced against the
    /// per-attempt timeout.
    async fn attempt_once<T, F, Fut>(
        &self,
        scheduler: &Scheduler,
        policy: &RetryPolicy,
        operation: &F,
    ) -> Result<T, VerisendError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, VerisendError>>,
    {
        self.wait_for_network(scheduler, policy).await?;
        match tokio::time::timeout(policy.timeout, operation()).await {
            Ok(result) => result,
            Err(_) => Err(VerisendError::Timeout {
                duration: policy.timeout,
            }),
        }
    }

    /// Polls the probe until it reports a usable connection, for at most
    /// `policy.network_wait`. A probe that stays down yields [`VerisendError::NoNetwork`],
    /// which the default classification treats as retryable.
    async fn wait_for_network(
        &self,
        scheduler: &Scheduler,
        policy: &RetryPolicy,
    ) -> Result<(), VerisendError> {
        let mut waited = Duration::ZERO;
        loop {
            if self.probe.current().await.online() {
                return Ok(());
            }
            if waited >= policy.network_wait {
                debug!(
                    waited_ms = waited.as_millis() as u64,
                    "connectivity wait exhausted"
                );
                return Err(VerisendError::NoNetwork);
            }
            scheduler.sleep(policy.network_poll).await?;
            waited += policy.network_poll;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use verisend_test_utils::{MockOtpProvider, SequenceProbe, StaticProbe};

    use verisend_core::{OtpChannel, OtpProvider, OtpSendRequest};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::default()
            .with_initial_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(1000))
    }

    #[tokio::test(start_paused = true)]
    async fn first_attempt_success_needs_no_delay() {
        let executor = RetryExecutor::new(Arc::new(StaticProbe::online()));
        let scheduler = Scheduler::detached();
        let start = tokio::time::Instant::now();

        let result = executor
            .execute(&scheduler, &fast_policy(), || async { Ok::<_, VerisendError>(7) })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn delays_double_and_cap_at_max() {
        let executor = RetryExecutor::new(Arc::new(StaticProbe::online()));
        let scheduler = Scheduler::detached();
        let policy = fast_policy().with_max_retries(5);
        let attempts = AtomicUsize::new(0);

        let start = tokio::time::Instant::now();
        let result: Result<(), _> = executor
            .execute(&scheduler, &policy, || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(VerisendError::provider_status(500, "server error")) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 6);
        // 100 + 200 + 400 + 800 + 1000 (capped) between the six attempts.
        assert_eq!(start.elapsed(), Duration::from_millis(2500));
    }

    #[tokio::test(start_paused = true)]
    async fn flat_backoff_when_factor_is_one() {
        let executor = RetryExecutor::new(Arc::new(StaticProbe::online()));
        let scheduler = Scheduler::detached();
        let policy = fast_policy().with_max_retries(3).with_backoff_factor(1.0);

        let start = tokio::time::Instant::now();
        let _: Result<(), _> = executor
            .execute(&scheduler, &policy, || async {
                Err(VerisendError::provider_status(503, "unavailable"))
            })
            .await;

        // Three sleeps of 100ms each, never grown.
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_errors_short_circuit() {
        let executor = RetryExecutor::new(Arc::new(StaticProbe::online()));
        let scheduler = Scheduler::detached();
        let attempts = AtomicUsize::new(0);

        let result: Result<(), _> = executor
            .execute(&scheduler, &fast_policy(), || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(VerisendError::provider_status(400, "bad request")) }
            })
            .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(matches!(
            result,
            Err(VerisendError::Provider {
                status: Some(400),
                ..
            })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_max_retries_means_one_attempt() {
        let executor = RetryExecutor::new(Arc::new(StaticProbe::online()));
        let scheduler = Scheduler::detached();
        let policy = fast_policy().with_max_retries(0);
        let attempts = AtomicUsize::new(0);

        let start = tokio::time::Instant::now();
        let result: Result<(), _> = executor
            .execute(&scheduler, &policy, || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(VerisendError::provider_status(500, "server error")) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn two_transient_failures_then_success() {
        let provider = Arc::new(MockOtpProvider::new());
        provider.push_status(500, "server error").await;
        provider.push_status(500, "server error").await;

        let executor = RetryExecutor::new(Arc::new(StaticProbe::online()));
        let scheduler = Scheduler::detached();
        let policy = fast_policy();
        let request = OtpSendRequest::new("+33612345678", OtpChannel::Sms);

        let start = tokio::time::Instant::now();
        let result = executor
            .execute(&scheduler, &policy, || {
                let provider = provider.clone();
                let request = request.clone();
                async move { provider.send(&request).await }
            })
            .await;

        assert!(result.is_ok());
        assert_eq!(provider.call_count(), 3);
        // 100ms + 200ms of backoff between the three attempts.
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn offline_probe_bounds_the_wait_then_fails_no_network() {
        let executor = RetryExecutor::new(Arc::new(StaticProbe::offline()));
        let scheduler = Scheduler::detached();
        let policy = fast_policy()
            .with_max_retries(0)
            .with_network_wait(Duration::from_secs(10))
            .with_network_poll(Duration::from_millis(500));
        let attempts = AtomicUsize::new(0);

        let start = tokio::time::Instant::now();
        let result: Result<(), _> = executor
            .execute(&scheduler, &policy, || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            })
            .await;

        assert!(matches!(result, Err(VerisendError::NoNetwork)));
        // The operation never ran; the gate gave up after the bounded wait.
        assert_eq!(attempts.load(Ordering::SeqCst), 0);
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn connectivity_returning_mid_wait_unblocks_the_attempt() {
        // Down for three polls, then up.
        let executor = RetryExecutor::new(Arc::new(SequenceProbe::down_for(3)));
        let scheduler = Scheduler::detached();
        let policy = fast_policy().with_network_poll(Duration::from_millis(500));

        let start = tokio::time::Instant::now();
        let result = executor
            .execute(&scheduler, &policy, || async { Ok::<_, VerisendError>(()) })
            .await;

        assert!(result.is_ok());
        assert_eq!(start.elapsed(), Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_operation_times_out_and_retries() {
        let provider = Arc::new(MockOtpProvider::new());
        provider.set_latency(Some(Duration::from_secs(60))).await;

        let executor = RetryExecutor::new(Arc::new(StaticProbe::online()));
        let scheduler = Scheduler::detached();
        let policy = fast_policy()
            .with_max_retries(1)
            .with_timeout(Duration::from_secs(5));
        let request = OtpSendRequest::new("+33612345678", OtpChannel::Sms);

        let result = executor
            .execute(&scheduler, &policy, || {
                let provider = provider.clone();
                let request = request.clone();
                async move { provider.send(&request).await }
            })
            .await;

        assert!(matches!(result, Err(VerisendError::Timeout { .. })));
        // Both attempts started and both were cut off at the timeout.
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_backoff() {
        let executor = Arc::new(RetryExecutor::new(Arc::new(StaticProbe::online())));
        let scheduler = Scheduler::detached();
        let worker = scheduler.clone();
        let policy = fast_policy()
            .with_max_retries(10)
            .with_initial_delay(Duration::from_secs(60));

        let handle = tokio::spawn(async move {
            executor
                .execute(&worker, &policy, || async {
                    Err::<(), _>(VerisendError::provider_status(500, "server error"))
                })
                .await
        });

        tokio::time::sleep(Duration::from_secs(1)).await;
        scheduler.cancel();

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(VerisendError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn on_retry_hook_sees_attempt_numbers() {
        let executor = RetryExecutor::new(Arc::new(StaticProbe::online()));
        let scheduler = Scheduler::detached();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let policy = fast_policy()
            .with_max_retries(2)
            .with_on_retry(move |attempt, _| sink.lock().unwrap().push(attempt));

        let _: Result<(), _> = executor
            .execute(&scheduler, &policy, || async {
                Err(VerisendError::provider_status(500, "server error"))
            })
            .await;

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }
}
