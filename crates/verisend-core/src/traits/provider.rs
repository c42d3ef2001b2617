// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OTP provider trait, the dispatch endpoint for one-time codes.

use async_trait::async_trait;

use crate::error::VerisendError;
use crate::types::{OtpSendRequest, ProviderReceipt};

/// The upstream service that actually delivers codes over SMS or WhatsApp.
///
/// A single call makes a single dispatch attempt; retry and timeout handling
/// live entirely in the caller. Implementations should map transport-level
/// failures to [`VerisendError::Provider`] with an HTTP status where one
/// exists, since the retry classifier keys off it.
#[async_trait]
pub trait OtpProvider: Send + Sync {
    /// Dispatches a one-time code for `request`.
    async fn send(&self, request: &OtpSendRequest) -> Result<ProviderReceipt, VerisendError>;
}
