// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable offline queue for OTP sends issued without connectivity.
//!
//! The queue is one JSON array under [`QUEUE_KEY`], ordered by insertion,
//! with at most one entry per phone key. Entries age out after a TTL and are
//! dropped after a bounded number of failed drain attempts, so the queue can
//! never grow stale retries forever.
//!
//! [`OfflineQueue::drain`] holds the queue guard for the whole pass and
//! persists exactly once at the end. Callbacks run inside that guard; they
//! may take per-key locks but must never call back into this queue.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use verisend_core::{Clock, DurableStore, QueuedSend, VerisendError};
use verisend_retry::Scheduler;

use crate::cooldown::CooldownTracker;
use crate::mask_key;

/// Store key holding the queue array.
pub const QUEUE_KEY: &str = "@offline_otp_queue";

/// Default cap on failed drain attempts per entry.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default time-to-live for a queued send.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);
/// Default pause between entries during a drain.
pub const DEFAULT_PACING: Duration = Duration::from_millis(500);

/// Outcome counters for one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Entries delivered and removed.
    pub sent: usize,
    /// Entries dropped as expired or exhausted.
    pub dropped: usize,
    /// Entries deferred by an active cooldown.
    pub deferred: usize,
    /// Entries that failed and stay queued.
    pub failed: usize,
    /// Entries left untouched because the drain was cancelled.
    pub skipped: usize,
}

/// Persistent queue of sends awaiting connectivity.
pub struct OfflineQueue {
    store: Arc<dyn DurableStore>,
    clock: Arc<dyn Clock>,
    max_attempts: u32,
    ttl: Duration,
    pacing: Duration,
    /// Serializes read-modify-write cycles and whole drain passes.
    guard: Mutex<()>,
}

impl OfflineQueue {
    pub fn new(store: Arc<dyn DurableStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_limits(store, clock, DEFAULT_MAX_ATTEMPTS, DEFAULT_TTL, DEFAULT_PACING)
    }

    pub fn with_limits(
        store: Arc<dyn DurableStore>,
        clock: Arc<dyn Clock>,
        max_attempts: u32,
        ttl: Duration,
        pacing: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            max_attempts,
            ttl,
            pacing,
            guard: Mutex::new(()),
        }
    }

    /// Inserts or refreshes the entry for `phone_key`.
    ///
    /// An existing entry keeps its id and queue position; its timestamp and
    /// metadata are refreshed and its retry counter starts over.
    pub async fn enqueue(&self, phone_key: &str, metadata: serde_json::Value) {
        let _guard = self.guard.lock().await;
        let now = self.clock.now();
        let mut entries = self.load().await;

        if let Some(existing) = entries.iter_mut().find(|e| e.phone_key == phone_key) {
            existing.enqueued_at = now;
            existing.retry_count = 0;
            existing.metadata = metadata;
            debug!(phone = %mask_key(phone_key), "refreshed queued send");
        } else {
            entries.push(QueuedSend {
                id: Uuid::new_v4(),
                phone_key: phone_key.to_string(),
                enqueued_at: now,
                retry_count: 0,
                metadata,
            });
            debug!(phone = %mask_key(phone_key), "queued send for later delivery");
        }
        self.persist(&entries).await;
    }

    /// Attempts delivery for every queued entry, in insertion order.
    ///
    /// Per entry: expired or exhausted entries are dropped; entries whose
    /// cooldown still blocks a resend are deferred with `retry_count + 1`;
    /// the rest go through `send_fn`, staying queued (again `retry_count + 1`)
    /// on failure. Successful sends are recorded in `cooldown`. A short
    /// pacing sleep separates entries so the provider never sees a burst.
    ///
    /// Cancellation through `scheduler` stops the pass; unprocessed entries
    /// stay queued untouched. The updated queue is persisted exactly once,
    /// at the end of the pass.
    pub async fn drain<F, Fut>(
        &self,
        cooldown: &CooldownTracker,
        scheduler: &Scheduler,
        send_fn: F,
    ) -> DrainReport
    where
        F: Fn(String, serde_json::Value) -> Fut,
        Fut: Future<Output = Result<(), VerisendError>>,
    {
        let _guard = self.guard.lock().await;
        let entries = self.load().await;
        if entries.is_empty() {
            debug!("offline queue empty, nothing to drain");
            return DrainReport::default();
        }
        info!(count = entries.len(), "draining offline queue");

        let mut report = DrainReport::default();
        let mut kept: Vec<QueuedSend> = Vec::with_capacity(entries.len());
        let mut cancelled = false;

        for (index, mut entry) in entries.into_iter().enumerate() {
            if cancelled {
                report.skipped += 1;
                kept.push(entry);
                continue;
            }
            if index > 0 && scheduler.sleep(self.pacing).await.is_err() {
                warn!("drain cancelled, keeping remaining entries");
                cancelled = true;
                report.skipped += 1;
                kept.push(entry);
                continue;
            }

            let now = self.clock.now();
            if self.expired(now, &entry) {
                info!(phone = %mask_key(&entry.phone_key), "dropping expired queue entry");
                report.dropped += 1;
                continue;
            }
            if entry.retry_count >= self.max_attempts {
                info!(
                    phone = %mask_key(&entry.phone_key),
                    retry_count = entry.retry_count,
                    "dropping exhausted queue entry"
                );
                report.dropped += 1;
                continue;
            }

            let status = cooldown.check_recent(&entry.phone_key).await;
            if status.has_recent && !status.can_resend {
                debug!(
                    phone = %mask_key(&entry.phone_key),
                    seconds_remaining = status.seconds_remaining,
                    "cooldown active, deferring queued send"
                );
                entry.retry_count += 1;
                report.deferred += 1;
                kept.push(entry);
                continue;
            }

            match send_fn(entry.phone_key.clone(), entry.metadata.clone()).await {
                Ok(()) => {
                    cooldown.record_sent(&entry.phone_key).await;
                    debug!(phone = %mask_key(&entry.phone_key), "queued send delivered");
                    report.sent += 1;
                }
                Err(error) => {
                    warn!(
                        phone = %mask_key(&entry.phone_key),
                        retry_count = entry.retry_count + 1,
                        error = %error,
                        "queued send failed, keeping entry"
                    );
                    entry.retry_count += 1;
                    report.failed += 1;
                    kept.push(entry);
                }
            }
        }

        self.persist(&kept).await;
        info!(
            sent = report.sent,
            dropped = report.dropped,
            deferred = report.deferred,
            failed = report.failed,
            skipped = report.skipped,
            remaining = kept.len(),
            "offline drain finished"
        );
        report
    }

    /// Sweeps expired and exhausted entries without attempting delivery.
    /// Returns how many entries were removed.
    pub async fn cleanup(&self) -> usize {
        let _guard = self.guard.lock().await;
        let now = self.clock.now();
        let entries = self.load().await;
        let before = entries.len();
        let kept: Vec<QueuedSend> = entries
            .into_iter()
            .filter(|e| !self.expired(now, e) && e.retry_count < self.max_attempts)
            .collect();
        let removed = before - kept.len();
        if removed > 0 {
            self.persist(&kept).await;
            info!(removed, remaining = kept.len(), "cleaned offline queue");
        }
        removed
    }

    /// Drops the entry for `phone_key`, if any. Idempotent.
    pub async fn remove(&self, phone_key: &str) {
        let _guard = self.guard.lock().await;
        let mut entries = self.load().await;
        let before = entries.len();
        entries.retain(|e| e.phone_key != phone_key);
        if entries.len() != before {
            self.persist(&entries).await;
            debug!(phone = %mask_key(phone_key), "removed queued send");
        }
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        let _guard = self.guard.lock().await;
        self.persist(&Vec::new()).await;
    }

    /// Number of queued entries, including ones due for cleanup.
    pub async fn len(&self) -> usize {
        let _guard = self.guard.lock().await;
        self.load().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Copy of the current queue contents, in order.
    pub async fn snapshot(&self) -> Vec<QueuedSend> {
        let _guard = self.guard.lock().await;
        self.load().await
    }

    fn expired(&self, now: DateTime<Utc>, entry: &QueuedSend) -> bool {
        let age_ms = (now - entry.enqueued_at).num_milliseconds();
        age_ms >= 0 && age_ms as u128 > self.ttl.as_millis()
    }

    async fn load(&self) -> Vec<QueuedSend> {
        let raw = match self.store.get(QUEUE_KEY).await {
            Ok(raw) => raw,
            Err(error) => {
                warn!(error = %error, "queue read failed, treating as empty");
                return Vec::new();
            }
        };
        let Some(raw) = raw else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(error = %error, "queue payload corrupt, discarding");
                Vec::new()
            }
        }
    }

    async fn persist(&self, entries: &[QueuedSend]) {
        let payload = match serde_json::to_string(entries) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(error = %error, "queue serialization failed, skipping write");
                return;
            }
        };
        if let Err(error) = self.store.set(QUEUE_KEY, &payload).await {
            warn!(error = %error, "queue write failed, continuing without");
        }
    }
}
