// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Network probe trait for connectivity snapshots.

use async_trait::async_trait;

use crate::types::NetworkState;

/// Source of connectivity snapshots.
///
/// Implementations must be side-effect free and cheap enough to call at a
/// sub-second polling interval; the retry engine polls one of these while
/// waiting for connectivity to return.
#[async_trait]
pub trait NetworkProbe: Send + Sync {
    /// Returns the current connectivity state.
    async fn current(&self) -> NetworkState;
}
