// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams the delivery pipeline is built against.
//!
//! Everything the subsystem touches in the outside world (connectivity,
//! persistence, the OTP provider, wall-clock time) comes in through one of
//! these traits, so each piece is testable in isolation.

pub mod clock;
pub mod probe;
pub mod provider;
pub mod store;

// Re-export all traits at the traits module level for convenience.
pub use clock::{Clock, SystemClock};
pub use probe::NetworkProbe;
pub use provider::OtpProvider;
pub use store::DurableStore;
