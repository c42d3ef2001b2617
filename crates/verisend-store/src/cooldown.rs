// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-phone send cooldown tracking.
//!
//! One JSON object under [`COOLDOWN_KEY`] maps each phone key to its
//! [`CooldownEntry`]. Every operation re-reads the store; nothing is cached
//! in memory, so multiple trackers over the same store stay consistent.
//!
//! The cooldown is an optimization layer: store failures and corrupt
//! payloads degrade to "no entry" with a warning instead of failing the
//! send path.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use verisend_core::{Clock, CooldownEntry, CooldownStatus, DurableStore};

use crate::mask_key;

/// Store key holding the cooldown map.
pub const COOLDOWN_KEY: &str = "@otp_cache";

/// Default cooldown window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(300);
/// Default minimum gap before a resend is allowed inside the window.
pub const DEFAULT_RESEND_AFTER: Duration = Duration::from_secs(60);

/// Tracks when each phone number last received a code.
pub struct CooldownTracker {
    store: Arc<dyn DurableStore>,
    clock: Arc<dyn Clock>,
    window: Duration,
    resend_after: Duration,
    /// Serializes read-modify-write cycles on the shared map.
    guard: Mutex<()>,
}

impl CooldownTracker {
    pub fn new(store: Arc<dyn DurableStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_windows(store, clock, DEFAULT_WINDOW, DEFAULT_RESEND_AFTER)
    }

    pub fn with_windows(
        store: Arc<dyn DurableStore>,
        clock: Arc<dyn Clock>,
        window: Duration,
        resend_after: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            window,
            resend_after,
            guard: Mutex::new(()),
        }
    }

    /// Cooldown status for `phone_key`.
    ///
    /// A missing or expired entry reads as "no recent send"; expired entries
    /// are deleted opportunistically on the way through.
    pub async fn check_recent(&self, phone_key: &str) -> CooldownStatus {
        let _guard = self.guard.lock().await;
        let now = self.clock.now();
        let mut map = self.load().await;

        let Some(entry) = map.get(phone_key).copied() else {
            return CooldownStatus::clear();
        };

        if now > entry.expires_at {
            map.remove(phone_key);
            self.persist(&map).await;
            debug!(phone = %mask_key(phone_key), "dropped expired cooldown entry");
            return CooldownStatus::clear();
        }

        let since_sent_ms = (now - entry.sent_at).num_milliseconds();
        let can_resend = since_sent_ms >= 0 && since_sent_ms as u128 >= self.resend_after.as_millis();
        let remaining_ms = (entry.expires_at - now).num_milliseconds().max(0) as u64;

        CooldownStatus {
            has_recent: true,
            can_resend,
            seconds_remaining: remaining_ms.div_ceil(1000),
        }
    }

    /// Records a successful send for `phone_key`, opening a fresh window.
    ///
    /// A send inside a still-live window counts as a resend and bumps the
    /// entry's resend counter; otherwise the counter starts at zero.
    pub async fn record_sent(&self, phone_key: &str) {
        let _guard = self.guard.lock().await;
        let now = self.clock.now();
        let mut map = self.load().await;

        let resend_count = match map.get(phone_key) {
            Some(previous) if now <= previous.expires_at => previous.resend_count + 1,
            _ => 0,
        };

        let window = chrono::Duration::milliseconds(self.window.as_millis() as i64);
        map.insert(
            phone_key.to_string(),
            CooldownEntry {
                sent_at: now,
                expires_at: now + window,
                resend_count,
            },
        );
        self.persist(&map).await;
        debug!(phone = %mask_key(phone_key), resend_count, "recorded otp send");
    }

    /// Drops the entry for `phone_key`. Idempotent.
    pub async fn clear(&self, phone_key: &str) {
        let _guard = self.guard.lock().await;
        let mut map = self.load().await;
        if map.remove(phone_key).is_some() {
            self.persist(&map).await;
            debug!(phone = %mask_key(phone_key), "cleared cooldown entry");
        }
    }

    /// Number of live (unexpired) entries.
    pub async fn len(&self) -> usize {
        let _guard = self.guard.lock().await;
        let now = self.clock.now();
        self.load()
            .await
            .values()
            .filter(|entry| now <= entry.expires_at)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn load(&self) -> HashMap<String, CooldownEntry> {
        let raw = match self.store.get(COOLDOWN_KEY).await {
            Ok(raw) => raw,
            Err(error) => {
                warn!(error = %error, "cooldown read failed, treating as empty");
                return HashMap::new();
            }
        };
        let Some(raw) = raw else {
            return HashMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(error) => {
                warn!(error = %error, "cooldown payload corrupt, discarding");
                HashMap::new()
            }
        }
    }

    async fn persist(&self, map: &HashMap<String, CooldownEntry>) {
        let payload = match serde_json::to_string(map) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(error = %error, "cooldown serialization failed, skipping write");
                return;
            }
        };
        if let Err(error) = self.store.set(COOLDOWN_KEY, &payload).await {
            warn!(error = %error, "cooldown write failed, continuing without");
        }
    }
}
