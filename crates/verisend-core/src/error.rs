// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Verisend OTP delivery subsystem.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across all Verisend trait seams and core operations.
#[derive(Debug, Error)]
pub enum VerisendError {
    /// The phone number failed validation or risk assessment. Never retried.
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    /// No usable connectivity after the bounded wait.
    #[error("no network connectivity")]
    NoNetwork,

    /// A single attempt exceeded the per-attempt budget.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// The OTP provider rejected or failed the dispatch.
    #[error("provider error{}: {message}", fmt_status(.status))]
    Provider {
        status: Option<u16>,
        message: String,
    },

    /// Durable store errors (read failure, write failure, serialization).
    #[error("store error: {source}")]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VerisendError {
    /// Validation error from any displayable reason.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Provider error carrying an HTTP-like status code.
    pub fn provider_status(status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Provider error with no status code (transport-level failures).
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            status: None,
            message: message.into(),
        }
    }

    /// Store error wrapping the backend's own error type.
    pub fn store(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Store {
            source: Box::new(source),
        }
    }
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {code})"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_display_includes_status_when_present() {
        let with_status = VerisendError::provider_status(503, "service unavailable");
        assert_eq!(
            with_status.to_string(),
            "provider error (status 503): service unavailable"
        );

        let without_status = VerisendError::provider("connection reset");
        assert_eq!(
            without_status.to_string(),
            "provider error: connection reset"
        );
    }

    #[test]
    fn store_preserves_source() {
        let err = VerisendError::store(std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "store error: disk full");
        assert!(std::error::Error::source(&err).is_some());
    }
}
