// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OTP delivery coordination for the Verisend subsystem.
//!
//! [`DeliveryCoordinator`] is the single entry point callers hold: it wires
//! the risk assessor, cooldown tracker, retry executor, and offline queue
//! behind one `send_otp` call, returning a typed [`SendOutcome`] instead of
//! ever raising. User-facing strings come from the [`messages`] catalog in
//! the configured locale.
//!
//! ```no_run
//! use std::sync::Arc;
//! use verisend_config::VerisendConfig;
//! use verisend_core::{OtpChannel, OtpSendRequest};
//! use verisend_delivery::DeliveryCoordinator;
//!
//! # async fn demo(
//! #     provider: Arc<dyn verisend_core::OtpProvider>,
//! #     probe: Arc<dyn verisend_core::NetworkProbe>,
//! #     store: Arc<dyn verisend_core::DurableStore>,
//! # ) {
//! let config = VerisendConfig::default();
//! let coordinator = DeliveryCoordinator::with_system_clock(&config, provider, probe, store);
//!
//! let request = OtpSendRequest::new("+33687429315", OtpChannel::Sms).with_country("FR");
//! let outcome = coordinator.send_otp(&request).await;
//! assert!(outcome.is_success() || outcome.reject_kind().is_some());
//! # }
//! ```

pub mod coordinator;
pub mod messages;
pub mod outcome;

pub use coordinator::DeliveryCoordinator;
pub use messages::Locale;
pub use outcome::{RejectKind, SendOutcome};
