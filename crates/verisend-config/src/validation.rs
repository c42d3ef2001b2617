// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as positive timeouts and window ordering.

use crate::diagnostic::ConfigError;
use crate::model::VerisendConfig;

/// Locales with message catalogs.
const SUPPORTED_LOCALES: &[&str] = &["en", "fr"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VerisendConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !config.retry.backoff_factor.is_finite() || config.retry.backoff_factor <= 0.0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "retry.backoff_factor must be a positive finite number, got {}",
                config.retry.backoff_factor
            ),
        });
    }

    if config.retry.timeout_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "retry.timeout_ms must be greater than zero".to_string(),
        });
    }

    if config.retry.network_poll_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "retry.network_poll_ms must be greater than zero".to_string(),
        });
    }

    if config.retry.max_delay_ms < config.retry.initial_delay_ms {
        errors.push(ConfigError::Validation {
            message: format!(
                "retry.max_delay_ms ({}) must not be below retry.initial_delay_ms ({})",
                config.retry.max_delay_ms, config.retry.initial_delay_ms
            ),
        });
    }

    if config.cooldown.window_secs < config.cooldown.resend_after_secs {
        errors.push(ConfigError::Validation {
            message: format!(
                "cooldown.window_secs ({}) must not be below cooldown.resend_after_secs ({})",
                config.cooldown.window_secs, config.cooldown.resend_after_secs
            ),
        });
    }

    if config.queue.max_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "queue.max_attempts must be at least 1".to_string(),
        });
    }

    if !SUPPORTED_LOCALES.contains(&config.delivery.locale.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "delivery.locale `{}` is not supported (expected one of: {})",
                config.delivery.locale,
                SUPPORTED_LOCALES.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
