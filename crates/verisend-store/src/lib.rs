// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence layer for the Verisend OTP delivery subsystem.
//!
//! Both components ride on the injected [`DurableStore`] seam: the
//! [`CooldownTracker`] keeps one JSON map of per-phone cooldowns, the
//! [`OfflineQueue`] one JSON array of pending sends. Store degradation is
//! absorbed here: a broken store makes these components forgetful, never
//! broken.

pub mod cooldown;
pub mod queue;

pub use cooldown::{CooldownTracker, COOLDOWN_KEY};
pub use queue::{DrainReport, OfflineQueue, QUEUE_KEY};

use tracing::{info, warn};

use verisend_core::DurableStore;

/// Masks a phone key for log output, keeping the prefix and the last two
/// digits: `+33687429315` becomes `+336…15`.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 6 {
        return "…".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}…{tail}")
}

/// Removes every Verisend-owned key from `store`. Returns how many keys were
/// removed. Read or write failures end the purge early with a warning.
pub async fn purge(store: &dyn DurableStore) -> usize {
    let keys = match store.all_keys().await {
        Ok(keys) => keys,
        Err(error) => {
            warn!(error = %error, "purge aborted, could not list keys");
            return 0;
        }
    };

    let mut removed = 0;
    for key in keys {
        if key != COOLDOWN_KEY && key != QUEUE_KEY {
            continue;
        }
        match store.remove(&key).await {
            Ok(()) => removed += 1,
            Err(error) => {
                warn!(error = %error, key = %key, "purge could not remove key");
            }
        }
    }
    if removed > 0 {
        info!(removed, "purged verisend state");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use verisend_test_utils::{ManualClock, MemoryStore};

    #[test]
    fn mask_key_keeps_ends_only() {
        assert_eq!(mask_key("+33687429315"), "+336…15");
        assert_eq!(mask_key("12345"), "…");
        assert_eq!(mask_key(""), "…");
    }

    #[tokio::test]
    async fn purge_removes_only_verisend_keys() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::fixed());

        let cooldown = CooldownTracker::new(store.clone(), clock.clone());
        let queue = OfflineQueue::new(store.clone(), clock.clone());
        cooldown.record_sent("+33687429315").await;
        queue
            .enqueue("+33687429315", serde_json::json!({"channel": "sms"}))
            .await;
        store.insert_raw("user_session", "keep me").await;

        let removed = purge(store.as_ref()).await;
        assert_eq!(removed, 2);
        assert_eq!(store.raw(COOLDOWN_KEY).await, None);
        assert_eq!(store.raw(QUEUE_KEY).await, None);
        assert_eq!(store.raw("user_session").await.as_deref(), Some("keep me"));
    }

    #[tokio::test]
    async fn purge_on_unreadable_store_returns_zero() {
        let store = MemoryStore::new();
        store.fail_reads(true);
        assert_eq!(purge(&store).await, 0);
    }
}
