// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retry engine for the Verisend OTP delivery subsystem.
//!
//! Provides the [`RetryExecutor`] (network-gated, timeout-raced, exponential
//! backoff), the [`RetryPolicy`] value type, the default error
//! classification, and the cancellation-aware [`Scheduler`] used by every
//! timed wait in the workspace.

pub mod classify;
pub mod executor;
pub mod policy;
pub mod scheduler;

pub use classify::default_retry_predicate;
pub use executor::RetryExecutor;
pub use policy::{RetryHook, RetryPolicy, RetryPredicate};
pub use scheduler::Scheduler;
