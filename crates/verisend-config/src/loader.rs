// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./verisend.toml` > `~/.config/verisend/verisend.toml` > `/etc/verisend/verisend.toml`
//! with environment variable overrides via `VERISEND_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::VerisendConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/verisend/verisend.toml` (system-wide)
/// 3. `~/.config/verisend/verisend.toml` (user XDG config)
/// 4. `./verisend.toml` (local directory)
/// 5. `VERISEND_*` environment variables
pub fn load_config() -> Result<VerisendConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used in tests and by callers that carry their own config text.
pub fn load_config_from_str(toml_content: &str) -> Result<VerisendConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VerisendConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VerisendConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VerisendConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(VerisendConfig::default()))
        .merge(Toml::file("/etc/verisend/verisend.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("verisend/verisend.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("verisend.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `VERISEND_RETRY_MAX_RETRIES` must
/// map to `retry.max_retries`, not `retry.max.retries`.
fn env_provider() -> Env {
    Env::prefixed("VERISEND_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: VERISEND_RETRY_MAX_RETRIES -> "retry_max_retries"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("retry_", "retry.", 1)
            .replacen("cooldown_", "cooldown.", 1)
            .replacen("queue_", "queue.", 1)
            .replacen("delivery_", "delivery.", 1);
        mapped.into()
    })
}
