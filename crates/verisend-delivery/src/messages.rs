// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Localized user-facing messages.
//!
//! Every string a caller may show to an end user comes from this table.
//! Raw error text (provider codes, store failures, stack traces) never
//! crosses the coordinator boundary.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use verisend_core::VerisendError;
use verisend_risk::RiskAssessment;

/// Message catalog language.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    /// Parses a config locale tag, falling back to English for anything
    /// unrecognized.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }
}

/// Keys into the message catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageKey {
    TooShort,
    Disposable,
    Suspicious,
    HighRisk,
    BadFormat,
    NoNetwork,
    TryAgain,
    ProviderRejected,
    Cancelled,
}

fn text(key: MessageKey, locale: Locale) -> &'static str {
    use MessageKey::*;
    match (locale, key) {
        (Locale::En, TooShort) => "This phone number is too short.",
        (Locale::En, Disposable) => {
            "This looks like a virtual or temporary number. Please use your personal number."
        }
        (Locale::En, Suspicious) => {
            "This number has a suspicious format. Double-check it before continuing."
        }
        (Locale::En, HighRisk) => "This number was flagged as high risk.",
        (Locale::En, BadFormat) => {
            "This number doesn't match the expected format for your country."
        }
        (Locale::En, NoNetwork) => "No internet connection. Check your network and try again.",
        (Locale::En, TryAgain) => "We couldn't send your code. Please try again.",
        (Locale::En, ProviderRejected) => "The messaging service rejected this number.",
        (Locale::En, Cancelled) => "The request was cancelled.",

        (Locale::Fr, TooShort) => "Ce numéro de téléphone est trop court.",
        (Locale::Fr, Disposable) => {
            "Ce numéro semble être un numéro virtuel ou temporaire. Merci d'utiliser votre numéro personnel."
        }
        (Locale::Fr, Suspicious) => {
            "Le format de ce numéro est suspect. Vérifiez-le avant de continuer."
        }
        (Locale::Fr, HighRisk) => "Ce numéro a été signalé comme à risque.",
        (Locale::Fr, BadFormat) => {
            "Ce numéro ne correspond pas au format attendu pour votre pays."
        }
        (Locale::Fr, NoNetwork) => {
            "Pas de connexion internet. Vérifiez votre réseau et réessayez."
        }
        (Locale::Fr, TryAgain) => "Impossible d'envoyer votre code. Veuillez réessayer.",
        (Locale::Fr, ProviderRejected) => "Le service de messagerie a refusé ce numéro.",
        (Locale::Fr, Cancelled) => "La demande a été annulée.",
    }
}

/// Message for a number the risk assessor rejected.
///
/// Precedence mirrors [`verisend_risk::risk_message`]: too-short, then
/// disposable, then suspicious, then the high-risk gate, with the
/// country-format message as the remaining rejection cause.
pub fn risk_rejection(assessment: &RiskAssessment, locale: Locale) -> String {
    let key = if assessment.reason.as_deref() == Some("too short") {
        MessageKey::TooShort
    } else if assessment.is_disposable {
        MessageKey::Disposable
    } else if assessment.is_suspicious {
        MessageKey::Suspicious
    } else if assessment.risk_score >= 70 {
        MessageKey::HighRisk
    } else {
        MessageKey::BadFormat
    };
    text(key, locale).to_string()
}

/// Success-shaped notice that a code is already in flight.
pub fn already_sent(seconds_remaining: u64, locale: Locale) -> String {
    match locale {
        Locale::En => format!("A code was already sent, it expires in {seconds_remaining}s."),
        Locale::Fr => format!("Un code a déjà été envoyé, il expire dans {seconds_remaining}s."),
    }
}

/// Message for a send that failed after the retry loop gave up.
pub fn send_failure(error: &VerisendError, locale: Locale) -> String {
    let key = match error {
        VerisendError::Validation { .. } => MessageKey::BadFormat,
        VerisendError::NoNetwork => MessageKey::NoNetwork,
        VerisendError::Cancelled => MessageKey::Cancelled,
        VerisendError::Provider {
            status: Some(status),
            ..
        } if (400..500).contains(status) && *status != 429 => MessageKey::ProviderRejected,
        _ => MessageKey::TryAgain,
    };
    text(key, locale).to_string()
}
