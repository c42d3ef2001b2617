// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default retryable / non-retryable error classification.

use verisend_core::VerisendError;

/// Message fragments that mark a failure as transient.
const RETRYABLE_FRAGMENTS: &[&str] = &[
    "network",
    "fetch",
    "timeout",
    "timed out",
    "connection",
    "connect",
    "unreachable",
    "socket",
    "temporarily",
    "reset",
];

/// Message fragments that mark a failure as permanent, caller-side.
const NON_RETRYABLE_FRAGMENTS: &[&str] = &[
    "invalid",
    "validation",
    "format",
    "malformed",
    "unsupported",
    "forbidden",
];

/// The classification used when a policy does not supply its own.
///
/// Status codes take precedence over message text: 429 and the 5xx family
/// retry, the rest of the 4xx family does not. Without a status, the message
/// is scanned for transient vocabulary first, then permanent vocabulary.
/// Anything still unclassified retries.
pub fn default_retry_predicate(error: &VerisendError) -> bool {
    match error {
        VerisendError::NoNetwork | VerisendError::Timeout { .. } => true,
        VerisendError::Validation { .. } | VerisendError::Cancelled => false,
        VerisendError::Provider {
            status: Some(status),
            message,
        } => match status {
            429 => true,
            500..=599 => true,
            400..=499 => false,
            _ => retryable_message(message),
        },
        VerisendError::Provider {
            status: None,
            message,
        } => retryable_message(message),
        VerisendError::Store { .. } | VerisendError::Internal(_) => true,
    }
}

fn retryable_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    if RETRYABLE_FRAGMENTS.iter().any(|f| lower.contains(f)) {
        return true;
    }
    if NON_RETRYABLE_FRAGMENTS.iter().any(|f| lower.contains(f)) {
        return false;
    }
    true
}
