// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock OTP provider for deterministic testing.
//!
//! `MockOtpProvider` implements `OtpProvider` with pre-scripted outcomes,
//! enabling fast, CI-runnable tests without a real SMS gateway.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use verisend_core::{OtpProvider, OtpSendRequest, ProviderReceipt, VerisendError};

/// A mock provider that pops outcomes from a FIFO queue.
///
/// When the queue is empty, a default receipt is returned. Every request is
/// captured for later inspection, and an optional artificial latency makes
/// timeout races testable under tokio's paused clock.
pub struct MockOtpProvider {
    outcomes: Mutex<VecDeque<Result<ProviderReceipt, VerisendError>>>,
    requests: Mutex<Vec<OtpSendRequest>>,
    latency: Mutex<Option<Duration>>,
    calls: AtomicUsize,
}

impl MockOtpProvider {
    /// Create a mock provider that accepts everything.
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            latency: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock provider pre-loaded with the given outcomes.
    pub fn with_outcomes(outcomes: Vec<Result<ProviderReceipt, VerisendError>>) -> Self {
        let provider = Self::new();
        *provider.outcomes.try_lock().expect("fresh mutex") = VecDeque::from(outcomes);
        provider
    }

    /// Queue a successful dispatch.
    pub async fn push_ok(&self) {
        self.outcomes.lock().await.push_back(Ok(Self::receipt()));
    }

    /// Queue a provider failure with an HTTP-like status code.
    pub async fn push_status(&self, status: u16, message: &str) {
        self.outcomes
            .lock()
            .await
            .push_back(Err(VerisendError::provider_status(status, message)));
    }

    /// Queue an arbitrary error.
    pub async fn push_err(&self, error: VerisendError) {
        self.outcomes.lock().await.push_back(Err(error));
    }

    /// Make every send take `latency` before resolving.
    pub async fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock().await = latency;
    }

    /// Number of send calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request seen so far, in call order.
    pub async fn requests(&self) -> Vec<OtpSendRequest> {
        self.requests.lock().await.clone()
    }

    fn receipt() -> ProviderReceipt {
        ProviderReceipt {
            message_id: Some(format!("mock-{}", uuid::Uuid::new_v4())),
        }
    }
}

impl Default for MockOtpProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpProvider for MockOtpProvider {
    async fn send(&self, request: &OtpSendRequest) -> Result<ProviderReceipt, VerisendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());

        let latency = *self.latency.lock().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Self::receipt()))
    }
}
