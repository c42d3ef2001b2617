// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data-driven risk heuristics: disposable ranges and suspicious patterns.
//!
//! Adding a provider or a pattern is a table edit here; scoring semantics
//! stay in the assessor.

use std::sync::LazyLock;

use regex::Regex;

/// A virtual/temporary number range and the provider that issues it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisposableRange {
    /// E.164 prefix including the leading `+`.
    pub prefix: &'static str,
    /// ISO 3166-1 alpha-2 country the range belongs to ("ZZ" for global).
    pub country: &'static str,
    /// Provider label, surfaced in rejection reasons.
    pub provider: &'static str,
}

/// Known virtual-number ranges used by disposable-SMS services.
pub const DISPOSABLE_RANGES: &[DisposableRange] = &[
    DisposableRange {
        prefix: "+3370",
        country: "FR",
        provider: "OnOff",
    },
    DisposableRange {
        prefix: "+33644",
        country: "FR",
        provider: "Free M2M",
    },
    DisposableRange {
        prefix: "+447520",
        country: "GB",
        provider: "Lleida.net",
    },
    DisposableRange {
        prefix: "+1800",
        country: "US",
        provider: "toll-free relay",
    },
    DisposableRange {
        prefix: "+1833",
        country: "US",
        provider: "toll-free relay",
    },
    DisposableRange {
        prefix: "+1844",
        country: "US",
        provider: "toll-free relay",
    },
    DisposableRange {
        prefix: "+1855",
        country: "US",
        provider: "toll-free relay",
    },
    DisposableRange {
        prefix: "+1866",
        country: "US",
        provider: "toll-free relay",
    },
    DisposableRange {
        prefix: "+1877",
        country: "US",
        provider: "toll-free relay",
    },
    DisposableRange {
        prefix: "+1888",
        country: "US",
        provider: "toll-free relay",
    },
    DisposableRange {
        prefix: "+882",
        country: "ZZ",
        provider: "iNum",
    },
    DisposableRange {
        prefix: "+883",
        country: "ZZ",
        provider: "iNum",
    },
];

/// Patterns that mark a number's shape as suspicious.
///
/// The whole family scores once, no matter how many patterns match. Applied
/// to the normalized form (leading `+` plus digits).
pub static SUSPICIOUS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // Five or more of the same digit in a row. The regex crate has no
        // backreferences, so the runs are spelled out per digit.
        Regex::new(r"0{5,}|1{5,}|2{5,}|3{5,}|4{5,}|5{5,}|6{5,}|7{5,}|8{5,}|9{5,}").unwrap(),
        // A block of zeros right after a 1-3 digit country code.
        Regex::new(r"^\+?[1-9]\d{0,2}0{5,}").unwrap(),
        // Keyboard-walk and placeholder blocks.
        Regex::new(r"123456|111111|999999").unwrap(),
    ]
});
