// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Verisend OTP delivery subsystem.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Verisend workspace. The delivery
//! pipeline, retry engine, and stores are all written against the seams
//! defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VerisendError;
pub use types::{
    CooldownEntry, CooldownStatus, NetworkState, OtpChannel, OtpSendRequest, ProviderReceipt,
    QueuedSend, Transport,
};

// Re-export all trait seams at crate root.
pub use traits::{Clock, DurableStore, NetworkProbe, OtpProvider, SystemClock};
