// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Verisend workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Connectivity transport reported by the network probe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Wifi,
    Cellular,
    Ethernet,
    None,
    Unknown,
}

/// Snapshot of device connectivity at one probe call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkState {
    /// Whether the device reports an active network interface.
    pub connected: bool,
    /// Whether traffic actually reaches the internet (captive portals report
    /// `connected` but not this).
    pub internet_reachable: bool,
    pub transport: Transport,
}

impl NetworkState {
    /// Connected state over the given transport.
    pub fn up(transport: Transport) -> Self {
        Self {
            connected: true,
            internet_reachable: true,
            transport,
        }
    }

    /// Fully disconnected state.
    pub fn down() -> Self {
        Self {
            connected: false,
            internet_reachable: false,
            transport: Transport::None,
        }
    }

    /// True when the device has a usable path to the internet.
    pub fn online(&self) -> bool {
        self.connected && self.internet_reachable
    }
}

/// Delivery channel for one-time codes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OtpChannel {
    Sms,
    Whatsapp,
}

/// A request to dispatch a one-time code to a phone number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtpSendRequest {
    /// Target number, E.164 preferred. Formatting noise is stripped before use.
    pub phone: String,
    pub channel: OtpChannel,
    /// Whether the provider should create an account for unknown numbers.
    pub create_user: bool,
    /// ISO 3166-1 alpha-2 country code. Enables risk assessment when present.
    pub country: Option<String>,
    /// Opaque payload forwarded to the provider untouched.
    pub metadata: serde_json::Value,
}

impl OtpSendRequest {
    pub fn new(phone: impl Into<String>, channel: OtpChannel) -> Self {
        Self {
            phone: phone.into(),
            channel,
            create_user: false,
            country: None,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_create_user(mut self, create_user: bool) -> Self {
        self.create_user = create_user;
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Receipt returned by a provider that accepted a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderReceipt {
    /// Provider-side message identifier, when the provider issues one.
    pub message_id: Option<String>,
}

/// Cooldown bookkeeping for one phone key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownEntry {
    pub sent_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// How many times a code was re-sent inside the current window.
    pub resend_count: u32,
}

/// Result of a cooldown lookup for one phone key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownStatus {
    /// An unexpired entry exists for this key.
    pub has_recent: bool,
    /// Enough time has passed since the last send to allow another.
    pub can_resend: bool,
    /// Whole seconds until the window expires, rounded up. Zero when clear.
    pub seconds_remaining: u64,
}

impl CooldownStatus {
    /// Status for a key with no live cooldown entry.
    pub fn clear() -> Self {
        Self {
            has_recent: false,
            can_resend: true,
            seconds_remaining: 0,
        }
    }
}

/// One send waiting in the offline queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedSend {
    pub id: Uuid,
    /// Normalized phone key; unique within the queue.
    pub phone_key: String,
    pub enqueued_at: DateTime<Utc>,
    /// Failed drain attempts so far.
    pub retry_count: u32,
    /// Request context captured at enqueue time.
    pub metadata: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn transport_round_trips_through_strings() {
        assert_eq!(Transport::Wifi.to_string(), "wifi");
        assert_eq!(Transport::from_str("cellular").unwrap(), Transport::Cellular);
        assert!(Transport::from_str("carrier-pigeon").is_err());
    }

    #[test]
    fn network_state_online_requires_both_flags() {
        assert!(NetworkState::up(Transport::Wifi).online());
        assert!(!NetworkState::down().online());

        let captive_portal = NetworkState {
            connected: true,
            internet_reachable: false,
            transport: Transport::Wifi,
        };
        assert!(!captive_portal.online());
    }

    #[test]
    fn otp_channel_serializes_lowercase() {
        let json = serde_json::to_string(&OtpChannel::Whatsapp).unwrap();
        assert_eq!(json, "\"whatsapp\"");
        let back: OtpChannel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OtpChannel::Whatsapp);
    }

    #[test]
    fn send_request_builder_defaults() {
        let req = OtpSendRequest::new("+33612345678", OtpChannel::Sms);
        assert!(!req.create_user);
        assert!(req.country.is_none());
        assert!(req.metadata.is_null());

        let req = req.with_country("FR").with_create_user(true);
        assert_eq!(req.country.as_deref(), Some("FR"));
        assert!(req.create_user);
    }

    #[test]
    fn queued_send_survives_json() {
        let entry = QueuedSend {
            id: Uuid::new_v4(),
            phone_key: "+33612345678".into(),
            enqueued_at: Utc::now(),
            retry_count: 2,
            metadata: serde_json::json!({"channel": "sms"}),
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: QueuedSend = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
