// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Verisend delivery subsystem.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Verisend configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VerisendConfig {
    /// Retry and timeout settings for provider calls.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Duplicate-send suppression settings.
    #[serde(default)]
    pub cooldown: CooldownConfig,

    /// Offline queue settings.
    #[serde(default)]
    pub queue: QueueConfig,

    /// Delivery coordinator settings.
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

/// Retry and timeout configuration for provider calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Number of retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Upper bound on the backoff delay, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Multiplier applied to the delay after each failed attempt.
    /// Values of 1.0 or below keep the delay flat.
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// Per-attempt wall-clock limit, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// How long an attempt waits for connectivity before failing, in milliseconds.
    #[serde(default = "default_network_wait_ms")]
    pub network_wait_ms: u64,

    /// Interval between connectivity probes while waiting, in milliseconds.
    #[serde(default = "default_network_poll_ms")]
    pub network_poll_ms: u64,
}

impl RetryConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn network_wait(&self) -> Duration {
        Duration::from_millis(self.network_wait_ms)
    }

    pub fn network_poll(&self) -> Duration {
        Duration::from_millis(self.network_poll_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_factor: default_backoff_factor(),
            timeout_ms: default_timeout_ms(),
            network_wait_ms: default_network_wait_ms(),
            network_poll_ms: default_network_poll_ms(),
        }
    }
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_backoff_factor() -> f64 {
    2.0
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_network_wait_ms() -> u64 {
    10_000
}

fn default_network_poll_ms() -> u64 {
    500
}

/// Duplicate-send suppression configuration.
///
/// A number that received a code inside the window is reported as already
/// served; a resend is only allowed once `resend_after_secs` have passed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CooldownConfig {
    /// How long a successful send suppresses duplicates, in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Minimum gap before a resend is allowed inside the window, in seconds.
    #[serde(default = "default_resend_after_secs")]
    pub resend_after_secs: u64,
}

impl CooldownConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn resend_after(&self) -> Duration {
        Duration::from_secs(self.resend_after_secs)
    }
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            resend_after_secs: default_resend_after_secs(),
        }
    }
}

fn default_window_secs() -> u64 {
    300 // 5 minutes
}

fn default_resend_after_secs() -> u64 {
    60
}

/// Offline queue configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    /// Drain attempts before an entry is dropped.
    #[serde(default = "default_queue_max_attempts")]
    pub max_attempts: u32,

    /// Hours an entry may sit in the queue before expiring.
    #[serde(default = "default_queue_ttl_hours")]
    pub ttl_hours: u64,

    /// Gap between consecutive sends during a drain, in milliseconds.
    #[serde(default = "default_queue_pacing_ms")]
    pub pacing_ms: u64,
}

impl QueueConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours * 3600)
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_queue_max_attempts(),
            ttl_hours: default_queue_ttl_hours(),
            pacing_ms: default_queue_pacing_ms(),
        }
    }
}

fn default_queue_max_attempts() -> u32 {
    3
}

fn default_queue_ttl_hours() -> u64 {
    24
}

fn default_queue_pacing_ms() -> u64 {
    500
}

/// Delivery coordinator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeliveryConfig {
    /// Locale for user-facing rejection and failure messages ("en" or "fr").
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
        }
    }
}

fn default_locale() -> String {
    "en".to_string()
}
