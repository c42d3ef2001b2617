// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phone-number risk assessment for the Verisend OTP delivery subsystem.
//!
//! Pure and synchronous: no I/O, no persistence, no clock. [`assess`] maps a
//! raw phone number and country code to a [`RiskAssessment`]; the heuristics
//! behind it live in data tables so new disposable ranges or patterns are
//! table entries, not code changes.

pub mod assessor;
pub mod normalize;
pub mod tables;

pub use assessor::{assess, risk_message, RiskAssessment};
pub use normalize::{digits, format_e164, normalize, normalize_key};
pub use tables::{DisposableRange, DISPOSABLE_RANGES, SUSPICIOUS_PATTERNS};
