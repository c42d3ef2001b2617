// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed result of one delivery attempt.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Why a send was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RejectKind {
    /// Risk assessment or normalization rejected the number. Never retried.
    InvalidNumber,
    /// The provider refused the request (4xx other than 429).
    ProviderRejected,
    /// Connectivity never came back or every retry failed.
    NetworkExhausted,
    /// The caller cancelled the send.
    Cancelled,
}

/// Outcome of [`DeliveryCoordinator::send_otp`](crate::DeliveryCoordinator::send_otp).
///
/// `AlreadySent` is success-shaped: a code is already in flight for this
/// number, so the caller should move on to the verification step rather than
/// show an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SendOutcome {
    /// The provider accepted the dispatch.
    Sent,
    /// A recent code is still live; no new send was attempted.
    AlreadySent {
        /// Whole seconds until the cooldown window expires.
        seconds_remaining: u64,
    },
    /// The send did not happen and will not happen without caller action.
    Rejected {
        kind: RejectKind,
        /// Short localized message safe to show to the end user.
        message: String,
    },
}

impl SendOutcome {
    /// True when a code is (or already was) on its way to the user.
    pub fn is_success(&self) -> bool {
        matches!(self, SendOutcome::Sent | SendOutcome::AlreadySent { .. })
    }

    /// The rejection kind, when this outcome is a rejection.
    pub fn reject_kind(&self) -> Option<RejectKind> {
        match self {
            SendOutcome::Rejected { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_sent_counts_as_success() {
        assert!(SendOutcome::Sent.is_success());
        assert!(SendOutcome::AlreadySent {
            seconds_remaining: 42
        }
        .is_success());
        assert!(!SendOutcome::Rejected {
            kind: RejectKind::InvalidNumber,
            message: "bad number".into(),
        }
        .is_success());
    }

    #[test]
    fn outcome_serializes_tagged() {
        let json = serde_json::to_string(&SendOutcome::AlreadySent {
            seconds_remaining: 240,
        })
        .unwrap();
        assert_eq!(json, r#"{"outcome":"already_sent","seconds_remaining":240}"#);

        let back: SendOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(
            back,
            SendOutcome::AlreadySent {
                seconds_remaining: 240
            }
        );
    }

    #[test]
    fn reject_kind_accessor() {
        let rejected = SendOutcome::Rejected {
            kind: RejectKind::NetworkExhausted,
            message: "try again".into(),
        };
        assert_eq!(rejected.reject_kind(), Some(RejectKind::NetworkExhausted));
        assert_eq!(SendOutcome::Sent.reject_kind(), None);
    }
}
