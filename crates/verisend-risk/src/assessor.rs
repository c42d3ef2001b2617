// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic risk scoring for phone numbers.
//!
//! [`assess`] is a pure function: identical input always yields an identical
//! assessment, nothing is persisted, and no input can make it panic or run
//! unbounded. Heuristics are additive; each one stacks its own score and the
//! total is clamped to 100.

use serde::{Deserialize, Serialize};

use crate::normalize::{digits, format_e164, normalize};
use crate::tables::{DISPOSABLE_RANGES, SUSPICIOUS_PATTERNS};

/// Score added when a disposable range matches.
const DISPOSABLE_SCORE: u32 = 50;
/// Score added when the suspicious-pattern family matches.
const PATTERN_SCORE: u32 = 30;
/// Score added for a sequential-digit run.
const SEQUENTIAL_SCORE: u32 = 20;
/// Score added for a country-format mismatch.
const FORMAT_SCORE: u32 = 10;
/// Total score at which a number is rejected outright.
const REJECT_THRESHOLD: u32 = 70;
/// Score below which no user-facing risk message is shown.
const MESSAGE_THRESHOLD: u32 = 30;
/// Minimum digits for a number to be assessable at all.
const MIN_DIGITS: usize = 6;
/// Minimum strictly-ascending or strictly-descending run length.
const SEQUENTIAL_RUN: usize = 4;

/// Dial codes for the countries with format rules.
const DIAL_CODES: &[(&str, &str)] = &[("FR", "33"), ("US", "1"), ("CA", "1"), ("GB", "44")];

/// Outcome of one phone-number risk assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Overall verdict. Forced to `false` at or above the reject threshold.
    pub is_valid: bool,
    /// Shape-based heuristics fired (patterns or sequential runs).
    pub is_suspicious: bool,
    /// The number sits in a known virtual-number range.
    pub is_disposable: bool,
    /// Additive heuristic score, clamped to `0..=100`.
    pub risk_score: u8,
    /// First detected machine-readable reason, if any heuristic fired.
    pub reason: Option<String>,
    /// User-facing remediation hints.
    pub suggestions: Vec<String>,
}

/// Assesses `phone` against every heuristic.
///
/// `country` is an ISO 3166-1 alpha-2 code; unknown countries skip the
/// format rule without penalty.
pub fn assess(phone: &str, country: &str) -> RiskAssessment {
    let normalized = normalize(phone);
    let number = digits(&normalized);

    if number.len() < MIN_DIGITS {
        return RiskAssessment {
            is_valid: false,
            is_suspicious: false,
            is_disposable: false,
            risk_score: 0,
            reason: Some("too short".to_string()),
            suggestions: Vec::new(),
        };
    }

    let mut score: u32 = 0;
    let mut is_valid = true;
    let mut is_suspicious = false;
    let mut is_disposable = false;
    let mut reason: Option<String> = None;
    let mut suggestions: Vec<String> = Vec::new();

    // 1. Disposable-range match on the E.164 candidate.
    let e164 = e164_candidate(&normalized, country);
    if let Some(range) = DISPOSABLE_RANGES.iter().find(|r| e164.starts_with(r.prefix)) {
        is_disposable = true;
        score += DISPOSABLE_SCORE;
        reason = Some(format!("virtual number detected ({})", range.provider));
        suggestions.push("use your personal number".to_string());
    }

    // 2. Suspicious-pattern family: one score hit regardless of how many
    //    patterns match.
    if SUSPICIOUS_PATTERNS.iter().any(|p| p.is_match(&normalized)) {
        is_suspicious = true;
        score += PATTERN_SCORE;
        if reason.is_none() {
            reason = Some("suspicious number format".to_string());
        }
    }

    // 3. Sequential-digit runs, scored independently of the pattern family.
    if has_sequential_run(&number, SEQUENTIAL_RUN) {
        is_suspicious = true;
        score += SEQUENTIAL_SCORE;
        suggestions.push("avoid sequential numbers".to_string());
    }

    // 4. Country-specific format rules.
    if let Some(mismatch) = country_format_error(&number, country) {
        is_valid = false;
        score += FORMAT_SCORE;
        if reason.is_none() {
            reason = Some(mismatch);
        }
    }

    // 5. Clamp, then reject outright above the threshold.
    let clamped = score.min(100);
    if clamped >= REJECT_THRESHOLD {
        is_valid = false;
        if reason.is_none() {
            reason = Some("high risk number".to_string());
        }
    }

    RiskAssessment {
        is_valid,
        is_suspicious,
        is_disposable,
        risk_score: clamped as u8,
        reason,
        suggestions,
    }
}

/// Short user-facing warning for a risky number, `None` below the display
/// threshold. Disposable wins over suspicious wins over the generic message.
pub fn risk_message(assessment: &RiskAssessment) -> Option<&'static str> {
    if u32::from(assessment.risk_score) < MESSAGE_THRESHOLD {
        return None;
    }
    if assessment.is_disposable {
        return Some("This looks like a virtual or temporary number. Please use your personal number.");
    }
    if assessment.is_suspicious {
        return Some("This number has a suspicious format. Double-check it before continuing.");
    }
    if u32::from(assessment.risk_score) >= REJECT_THRESHOLD {
        return Some("This number was flagged as high risk.");
    }
    None
}

/// Best-effort E.164 form for prefix matching. Numbers without a `+` get the
/// country's dial code attached when we know it.
fn e164_candidate(normalized: &str, country: &str) -> String {
    if normalized.starts_with('+') {
        return normalized.to_string();
    }
    match dial_code(country) {
        Some(dial) => format_e164(normalized, dial),
        None => normalized.to_string(),
    }
}

fn dial_code(country: &str) -> Option<&'static str> {
    let upper = country.trim().to_ascii_uppercase();
    DIAL_CODES
        .iter()
        .find(|(code, _)| *code == upper)
        .map(|(_, dial)| *dial)
}

/// True when `number` contains a strictly ascending or strictly descending
/// run of at least `min_run` digits.
fn has_sequential_run(number: &str, min_run: usize) -> bool {
    let bytes = number.as_bytes();
    if bytes.len() < min_run {
        return false;
    }
    let mut ascending = 1usize;
    let mut descending = 1usize;
    for pair in bytes.windows(2) {
        if pair[1] == pair[0] + 1 {
            ascending += 1;
            descending = 1;
        } else if pair[0] == pair[1] + 1 {
            descending += 1;
            ascending = 1;
        } else {
            ascending = 1;
            descending = 1;
        }
        if ascending >= min_run || descending >= min_run {
            return true;
        }
    }
    false
}

/// `Some(message)` when the number violates its country's format rule.
/// Countries without a rule pass unconditionally.
fn country_format_error(number: &str, country: &str) -> Option<String> {
    let upper = country.trim().to_ascii_uppercase();
    match upper.as_str() {
        "FR" => {
            let national = national_digits(number, "33");
            let first = national.as_bytes().first();
            if national.len() == 9 && matches!(first, Some(b'6' | b'7')) {
                None
            } else {
                Some("French mobile numbers have 9 digits and start with 6 or 7".to_string())
            }
        }
        "US" | "CA" => {
            let national = national_digits(number, "1");
            let b = national.as_bytes();
            if b.len() == 10 && (b'2'..=b'9').contains(&b[0]) && (b'2'..=b'9').contains(&b[3]) {
                None
            } else {
                Some(
                    "North American numbers have 10 digits, with area code and exchange starting 2-9"
                        .to_string(),
                )
            }
        }
        "GB" => {
            let national = national_digits(number, "44");
            if national.len() == 10 && national.starts_with('7') {
                None
            } else {
                Some("UK mobile numbers have 10 digits and start with 7".to_string())
            }
        }
        _ => None,
    }
}

/// National significant number: digits with the dial code, or one trunk `0`,
/// stripped off the front.
fn national_digits<'a>(number: &'a str, dial: &str) -> &'a str {
    if let Some(rest) = number.strip_prefix(dial) {
        rest
    } else if let Some(rest) = number.strip_prefix('0') {
        rest
    } else {
        number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposable_plus_sequential_crosses_the_reject_threshold() {
        let a = assess("+33703456789", "FR");
        assert!(a.is_disposable);
        assert!(a.is_suspicious);
        assert!(!a.is_valid);
        assert_eq!(a.risk_score, 70);
        // The disposable reason was detected first and sticks.
        assert_eq!(a.reason.as_deref(), Some("virtual number detected (OnOff)"));
        assert!(a.suggestions.iter().any(|s| s.contains("personal number")));
        assert!(a.suggestions.iter().any(|s| s.contains("sequential")));
    }

    #[test]
    fn clean_french_mobile_passes() {
        let a = assess("+33687429315", "FR");
        assert!(a.is_valid);
        assert!(!a.is_suspicious);
        assert!(!a.is_disposable);
        assert!(a.risk_score < 30);
        assert_eq!(a.reason, None);
        assert_eq!(risk_message(&a), None);
    }

    #[test]
    fn too_short_short_circuits() {
        let a = assess("12345", "FR");
        assert!(!a.is_valid);
        assert_eq!(a.reason.as_deref(), Some("too short"));
        assert_eq!(a.risk_score, 0);
        assert!(a.suggestions.is_empty());

        let a = assess("++--()", "US");
        assert_eq!(a.reason.as_deref(), Some("too short"));
    }

    #[test]
    fn repeated_digits_are_suspicious_not_fatal_alone() {
        let a = assess("+33699999999", "FR");
        assert!(a.is_suspicious);
        assert!(!a.is_disposable);
        // Pattern family fires once (repeated run and 999999 literal are the
        // same family); format is fine, so the score stays at 30.
        assert_eq!(a.risk_score, 30);
        assert!(a.is_valid);
        assert_eq!(a.reason.as_deref(), Some("suspicious number format"));
    }

    #[test]
    fn sequential_and_pattern_scores_stack() {
        // 123456 literal (+30) and the ascending run (+20), format ok.
        let a = assess("+33612345678", "FR");
        assert!(a.is_suspicious);
        assert_eq!(a.risk_score, 50);
        assert!(a.is_valid);
        assert_eq!(a.reason.as_deref(), Some("suspicious number format"));
        assert!(a.suggestions.iter().any(|s| s.contains("sequential")));
    }

    #[test]
    fn descending_runs_count_too() {
        let a = assess("+33698765432", "FR");
        assert!(a.is_suspicious);
        assert_eq!(a.risk_score, 20);
        assert!(a.suggestions.iter().any(|s| s.contains("sequential")));
    }

    #[test]
    fn format_mismatch_alone_invalidates_with_low_score() {
        // 8 national digits instead of 9; no other heuristic fires.
        let a = assess("+3368742931", "FR");
        assert!(!a.is_valid);
        assert!(!a.is_suspicious);
        assert_eq!(a.risk_score, 10);
        assert!(a.reason.as_deref().unwrap_or("").contains("French mobile"));
    }

    #[test]
    fn nanp_rules_check_area_code_and_exchange() {
        assert!(assess("+14155552671", "US").is_valid);
        // Area code starting with 1 is not a valid NANP area code.
        let a = assess("+11155552671", "US");
        assert!(!a.is_valid);
        assert!(a.reason.as_deref().unwrap_or("").contains("North American"));
        // CA shares the rule.
        assert!(assess("+16135550123", "CA").is_valid);
    }

    #[test]
    fn gb_mobiles_start_with_seven() {
        assert!(assess("+447911864205", "GB").is_valid);
        let a = assess("+441911987204", "GB");
        assert!(!a.is_valid);
        assert!(a.reason.as_deref().unwrap_or("").contains("UK mobile"));
    }

    #[test]
    fn unknown_countries_skip_format_rules() {
        let a = assess("+81312345678", "JP");
        // Sequential "123456" fires, but no format penalty for Japan.
        assert!(a.risk_score >= 30);
        assert!(!a.reason.as_deref().unwrap_or("").contains("digits"));
    }

    #[test]
    fn disposable_match_works_without_plus_when_country_known() {
        // Local form of a +3370 OnOff number.
        let a = assess("07 03 45 67 89", "FR");
        assert!(a.is_disposable);
        assert!(a.risk_score >= 50);
    }

    #[test]
    fn toll_free_nanp_ranges_are_disposable() {
        let a = assess("+18005551234", "US");
        assert!(a.is_disposable);
        assert_eq!(
            a.reason.as_deref(),
            Some("virtual number detected (toll-free relay)")
        );
    }

    #[test]
    fn risk_message_precedence_is_disposable_then_suspicious_then_generic() {
        let disposable = assess("+33703456789", "FR");
        assert!(risk_message(&disposable).unwrap().contains("virtual"));

        let suspicious = assess("+33699999999", "FR");
        assert!(risk_message(&suspicious).unwrap().contains("suspicious"));

        let below_threshold = assess("+33698765432", "FR");
        assert_eq!(risk_message(&below_threshold), None);
    }

    #[test]
    fn assessment_serializes_for_client_consumption() {
        let value = serde_json::to_value(assess("+33703456789", "FR")).unwrap();
        assert_eq!(value["is_valid"], false);
        assert_eq!(value["is_disposable"], true);
        assert_eq!(value["risk_score"], 70);
        assert!(value["reason"].as_str().unwrap().contains("OnOff"));
    }

    #[test]
    fn injection_and_unicode_garbage_is_handled() {
        let a = assess("'; DROP TABLE users; --", "US");
        assert_eq!(a.reason.as_deref(), Some("too short"));

        let a = assess("+1\u{202e}4155552671\u{0000}", "US");
        assert!(a.risk_score <= 100);

        let long = "9".repeat(1000);
        let a = assess(&long, "FR");
        assert!(a.is_suspicious);
        assert!(a.risk_score <= 100);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn score_is_bounded_for_arbitrary_input(
                phone in ".{0,1000}",
                country in "[A-Za-z]{0,3}"
            ) {
                let a = assess(&phone, &country);
                prop_assert!(a.risk_score <= 100);
                // Rejection always comes with a reason.
                if !a.is_valid {
                    prop_assert!(a.reason.is_some());
                }
            }

            #[test]
            fn assessment_is_deterministic(
                phone in "[+0-9 ().-]{0,64}",
                country in "[A-Z]{2}"
            ) {
                prop_assert_eq!(assess(&phone, &country), assess(&phone, &country));
            }

            #[test]
            fn scores_at_or_above_seventy_always_invalidate(
                digits in "[0-9]{6,20}"
            ) {
                let a = assess(&digits, "FR");
                if a.risk_score >= 70 {
                    prop_assert!(!a.is_valid);
                }
            }
        }
    }
}
