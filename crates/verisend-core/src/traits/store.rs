// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable key/value store trait for cooldown and queue persistence.

use async_trait::async_trait;

use crate::error::VerisendError;

/// String key/value persistence seam.
///
/// The cooldown cache and the offline queue each keep their state as one JSON
/// document under a well-known key. Implementations only need atomic
/// single-key reads and writes; cross-key transactions are never required.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Fetches the value for `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>, VerisendError>;

    /// Sets `key` to `value`, creating or replacing it.
    async fn set(&self, key: &str, value: &str) -> Result<(), VerisendError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), VerisendError>;

    /// Every key currently present, in no particular order.
    async fn all_keys(&self) -> Result<Vec<String>, VerisendError>;
}
