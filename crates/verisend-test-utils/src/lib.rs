// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Verisend integration tests.
//!
//! Provides mock implementations of every trait seam for fast, deterministic,
//! CI-runnable tests without real networks, gateways, or wall-clock time.
//!
//! # Components
//!
//! - [`MemoryStore`] - In-memory durable store with failure injection
//! - [`MockOtpProvider`] - Scripted OTP provider with request capture
//! - [`StaticProbe`] / [`SequenceProbe`] - Settable and scripted network probes
//! - [`ManualClock`] - Clock that only advances on demand

pub mod manual_clock;
pub mod mock_probe;
pub mod mock_provider;
pub mod mock_store;

pub use manual_clock::ManualClock;
pub use mock_probe::{SequenceProbe, StaticProbe};
pub use mock_provider::MockOtpProvider;
pub use mock_store::MemoryStore;
