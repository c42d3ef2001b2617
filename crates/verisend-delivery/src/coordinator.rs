// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery coordinator tying the subsystem together.
//!
//! One `send_otp` call flows: risk gate -> cooldown check -> provider send
//! under the retry executor -> cooldown record. The coordinator integrates:
//! - **Risk assessor**: rejects bad numbers before any network traffic
//! - **Cooldown tracker**: collapses duplicate requests into `AlreadySent`
//! - **Retry executor**: network-gated attempts with exponential backoff
//! - **Offline queue**: explicit caller-driven fallback, drained on reconnect
//!
//! The coordinator never returns `Err`. Every failure becomes a
//! [`SendOutcome::Rejected`] carrying a short localized message.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use verisend_config::{RetryConfig, VerisendConfig};
use verisend_core::{
    Clock, DurableStore, NetworkProbe, OtpChannel, OtpProvider, OtpSendRequest, SystemClock,
    VerisendError,
};
use verisend_retry::{RetryExecutor, RetryPolicy, Scheduler};
use verisend_risk::{assess, digits, normalize_key};
use verisend_store::{mask_key, CooldownTracker, DrainReport, OfflineQueue};

use crate::messages::{self, Locale};
use crate::outcome::{RejectKind, SendOutcome};

/// Orchestrates one-time-code delivery end to end.
///
/// All collaborators are injected; nothing here touches ambient state, so a
/// coordinator over a fake clock, probe, store, and provider is fully
/// deterministic.
pub struct DeliveryCoordinator {
    provider: Arc<dyn OtpProvider>,
    executor: RetryExecutor,
    cooldown: CooldownTracker,
    queue: OfflineQueue,
    default_policy: RetryPolicy,
    /// Per-entry policy for queue drains. Queue-level retry counting already
    /// provides the outer attempts, so the inner loop retries once at most.
    drain_policy: RetryPolicy,
    locale: Locale,
    /// One async mutex per normalized phone key. Serializes the whole
    /// check -> send -> record section for a key; distinct keys run
    /// concurrently.
    key_locks: DashMap<String, Arc<Mutex<()>>>,
    root: CancellationToken,
}

impl DeliveryCoordinator {
    pub fn new(
        config: &VerisendConfig,
        provider: Arc<dyn OtpProvider>,
        probe: Arc<dyn NetworkProbe>,
        store: Arc<dyn DurableStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let default_policy = policy_from_config(&config.retry);
        let drain_policy = default_policy.clone().with_max_retries(1);
        Self {
            provider,
            executor: RetryExecutor::new(probe),
            cooldown: CooldownTracker::with_windows(
                store.clone(),
                clock.clone(),
                config.cooldown.window(),
                config.cooldown.resend_after(),
            ),
            queue: OfflineQueue::with_limits(
                store,
                clock,
                config.queue.max_attempts,
                config.queue.ttl(),
                config.queue.pacing(),
            ),
            default_policy,
            drain_policy,
            locale: Locale::from_tag(&config.delivery.locale),
            key_locks: DashMap::new(),
            root: CancellationToken::new(),
        }
    }

    /// Coordinator over the real wall clock.
    pub fn with_system_clock(
        config: &VerisendConfig,
        provider: Arc<dyn OtpProvider>,
        probe: Arc<dyn NetworkProbe>,
        store: Arc<dyn DurableStore>,
    ) -> Self {
        Self::new(config, provider, probe, store, Arc::new(SystemClock))
    }

    /// Sends a one-time code under the configured default policy.
    pub async fn send_otp(&self, request: &OtpSendRequest) -> SendOutcome {
        let scheduler = Scheduler::new(self.root.child_token());
        self.send_otp_with(request, &self.default_policy, &scheduler)
            .await
    }

    /// Sends a one-time code under a caller-supplied policy and scheduler.
    ///
    /// The scheduler doubles as the cancellation handle: cancelling it stops
    /// the retry loop before the next attempt starts. An attempt already
    /// dispatched to the provider is left to finish on its own.
    pub async fn send_otp_with(
        &self,
        request: &OtpSendRequest,
        policy: &RetryPolicy,
        scheduler: &Scheduler,
    ) -> SendOutcome {
        let key = normalize_key(&request.phone);
        if digits(&key).is_empty() {
            warn!("send rejected, no digits in phone input");
            return SendOutcome::Rejected {
                kind: RejectKind::InvalidNumber,
                message: messages::send_failure(
                    &VerisendError::validation("empty phone number"),
                    self.locale,
                ),
            };
        }

        // Risk gate runs before any network traffic and only when the caller
        // supplied a country to assess against.
        if let Some(country) = &request.country {
            let assessment = assess(&request.phone, country);
            if !assessment.is_valid {
                warn!(
                    phone = %mask_key(&key),
                    risk_score = assessment.risk_score,
                    reason = assessment.reason.as_deref().unwrap_or("unspecified"),
                    "send blocked by risk assessment"
                );
                return SendOutcome::Rejected {
                    kind: RejectKind::InvalidNumber,
                    message: messages::risk_rejection(&assessment, self.locale),
                };
            }
        }

        // The whole check -> send -> record section holds the key lock so two
        // callers racing on the same number cannot both pass the cooldown
        // check.
        let lock = self.key_lock(&key);
        let _guard = lock.lock().await;

        let status = self.cooldown.check_recent(&key).await;
        if status.has_recent && !status.can_resend {
            debug!(
                phone = %mask_key(&key),
                seconds_remaining = status.seconds_remaining,
                "recent code still live, skipping send"
            );
            return SendOutcome::AlreadySent {
                seconds_remaining: status.seconds_remaining,
            };
        }

        match self
            .executor
            .execute(scheduler, policy, || self.provider.send(request))
            .await
        {
            Ok(receipt) => {
                self.cooldown.record_sent(&key).await;
                info!(
                    phone = %mask_key(&key),
                    channel = %request.channel,
                    message_id = receipt.message_id.as_deref().unwrap_or(""),
                    "otp dispatched"
                );
                SendOutcome::Sent
            }
            Err(error) => {
                warn!(phone = %mask_key(&key), error = %error, "otp send failed");
                SendOutcome::Rejected {
                    kind: reject_kind(&error),
                    message: messages::send_failure(&error, self.locale),
                }
            }
        }
    }

    /// Queues a request for later delivery.
    ///
    /// This is the explicit escalation path after a `NetworkExhausted`
    /// rejection; a failed `send_otp` never queues on its own.
    pub async fn queue_offline(&self, request: &OtpSendRequest) {
        let key = normalize_key(&request.phone);
        if digits(&key).is_empty() {
            warn!("not queueing request with no digits in phone input");
            return;
        }
        self.queue.enqueue(&key, pack_request(request)).await;
    }

    /// Re-attempts every queued send, in order. Intended to run on
    /// connectivity-restored events.
    pub async fn drain_offline(&self) -> DrainReport {
        let scheduler = Scheduler::new(self.root.child_token());
        let send_scheduler = scheduler.clone();
        self.queue
            .drain(&self.cooldown, &scheduler, move |phone_key, metadata| {
                let scheduler = send_scheduler.clone();
                async move { self.redeliver(&phone_key, metadata, &scheduler).await }
            })
            .await
    }

    /// Clears the cooldown window and any queued send for `phone`, for use
    /// once the user has verified a code. The next request goes straight
    /// through.
    pub async fn mark_verified(&self, phone: &str) {
        let key = normalize_key(phone);
        self.cooldown.clear(&key).await;
        self.queue.remove(&key).await;
        info!(phone = %mask_key(&key), "verified, cooldown and queue entries cleared");
    }

    /// Cancels every in-flight and future send. Terminal: intended for app
    /// shutdown, not for pausing.
    pub fn cancel_all(&self) {
        self.root.cancel();
    }

    pub fn cooldown(&self) -> &CooldownTracker {
        &self.cooldown
    }

    pub fn queue(&self) -> &OfflineQueue {
        &self.queue
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// One drain delivery. Runs inside the queue's drain guard, so it may
    /// take the per-key lock but must not call back into the queue.
    async fn redeliver(
        &self,
        phone_key: &str,
        metadata: serde_json::Value,
        scheduler: &Scheduler,
    ) -> Result<(), VerisendError> {
        let lock = self.key_lock(phone_key);
        let _guard = lock.lock().await;

        // A direct send may have recorded a cooldown between the drain's
        // queue-level check and this lock acquisition. A code is in flight
        // either way, so report success and let the entry leave the queue.
        let status = self.cooldown.check_recent(phone_key).await;
        if status.has_recent && !status.can_resend {
            debug!(
                phone = %mask_key(phone_key),
                "concurrent send beat the drain, dropping queued duplicate"
            );
            return Ok(());
        }

        let request = unpack_queued(phone_key, metadata);
        self.executor
            .execute(scheduler, &self.drain_policy, || {
                self.provider.send(&request)
            })
            .await
            .map(|_receipt| ())
    }

    fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        self.key_locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Builds the executor policy from the retry config section. Classification
/// and hooks keep their defaults.
fn policy_from_config(retry: &RetryConfig) -> RetryPolicy {
    RetryPolicy {
        max_retries: retry.max_retries,
        initial_delay: retry.initial_delay(),
        max_delay: retry.max_delay(),
        backoff_factor: retry.backoff_factor,
        timeout: retry.timeout(),
        network_wait: retry.network_wait(),
        network_poll: retry.network_poll(),
        ..RetryPolicy::default()
    }
}

fn reject_kind(error: &VerisendError) -> RejectKind {
    match error {
        VerisendError::Validation { .. } => RejectKind::InvalidNumber,
        VerisendError::Cancelled => RejectKind::Cancelled,
        VerisendError::Provider {
            status: Some(status),
            ..
        } if (400..500).contains(status) && *status != 429 => RejectKind::ProviderRejected,
        _ => RejectKind::NetworkExhausted,
    }
}

/// Captures the request context a queued send needs to be replayed later.
fn pack_request(request: &OtpSendRequest) -> serde_json::Value {
    serde_json::json!({
        "channel": request.channel,
        "create_user": request.create_user,
        "country": request.country,
        "extra": request.metadata,
    })
}

/// Rebuilds a request from a queue entry. Unknown or missing fields fall
/// back to defaults rather than failing the drain.
fn unpack_queued(phone_key: &str, metadata: serde_json::Value) -> OtpSendRequest {
    let channel = metadata
        .get("channel")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or(OtpChannel::Sms);
    let create_user = metadata
        .get("create_user")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let country = metadata
        .get("country")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let extra = metadata
        .get("extra")
        .cloned()
        .unwrap_or(serde_json::Value::Null);

    OtpSendRequest {
        phone: phone_key.to_string(),
        channel,
        create_user,
        country,
        metadata: extra,
    }
}
