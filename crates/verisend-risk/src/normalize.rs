// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phone-number normalization helpers.
//!
//! These never validate; they only strip formatting noise and build E.164
//! candidates. Validation is the assessor's job.

/// Strips everything but digits and one leading `+` from raw user input.
///
/// Spaces, dashes, dots, parentheses, and any other decoration are dropped.
/// A `+` anywhere but the front is noise and dropped too.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut out = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        if c.is_ascii_digit() {
            out.push(c);
        } else if c == '+' && out.is_empty() {
            out.push('+');
        }
    }
    out
}

/// The canonical key a phone number is stored and locked under.
///
/// Currently the normalized form; callers are expected to hand the same
/// representation (ideally E.164) to every entry point so lookups agree.
pub fn normalize_key(raw: &str) -> String {
    normalize(raw)
}

/// Just the digits, no `+`.
pub fn digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Formats a locally-entered number as E.164 for the given dial code.
///
/// `("06 12 34 56 78", "33")` becomes `"+33612345678"`. Numbers already
/// carrying the dial code pass through with just a `+` prepended; a leading
/// trunk `0` is dropped before the dial code is attached.
pub fn format_e164(phone: &str, dial_code: &str) -> String {
    let number = digits(phone);
    let dial = digits(dial_code);

    if number.is_empty() {
        return String::new();
    }
    if dial.is_empty() {
        return format!("+{number}");
    }
    if number.starts_with(&dial) {
        return format!("+{number}");
    }
    if let Some(rest) = number.strip_prefix('0') {
        return format!("+{dial}{rest}");
    }
    format!("+{dial}{number}")
}
