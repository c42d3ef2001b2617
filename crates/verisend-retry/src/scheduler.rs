// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cancellation-aware sleep primitive.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use verisend_core::VerisendError;

/// A timer facade bound to a [`CancellationToken`].
///
/// Every suspension point in the subsystem (retry backoff, the bounded
/// connectivity wait, queue drain pacing) sleeps through one of these, so a
/// single token interrupts them all promptly instead of at the next loop
/// iteration.
#[derive(Debug, Clone)]
pub struct Scheduler {
    cancel: CancellationToken,
}

impl Scheduler {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Scheduler with a token nobody else holds; it can only be cancelled
    /// through this instance and its clones.
    pub fn detached() -> Self {
        Self::new(CancellationToken::new())
    }

    /// Child scheduler that is cancelled when this one is, but not vice versa.
    pub fn child(&self) -> Self {
        Self::new(self.cancel.child_token())
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Sleeps for `duration`, returning `Err(Cancelled)` if the token fires
    /// first.
    pub async fn sleep(&self, duration: Duration) -> Result<(), VerisendError> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(VerisendError::Cancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::detached()
    }
}
