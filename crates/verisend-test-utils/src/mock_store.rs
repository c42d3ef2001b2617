// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory durable store with failure injection for deterministic testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use verisend_core::{DurableStore, VerisendError};

/// A `DurableStore` backed by a `HashMap`, with switches to make reads or
/// writes fail on demand and a counter for write calls.
///
/// The write counter makes "persisted exactly once" assertions possible in
/// queue drain tests.
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    set_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            set_calls: AtomicUsize::new(0),
        }
    }

    /// Makes every subsequent `get` / `all_keys` call fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `set` / `remove` call fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `set` calls since construction (failed ones included).
    pub fn set_call_count(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    /// Seeds a raw value, bypassing the failure switches. Used to plant
    /// corrupt payloads.
    pub async fn insert_raw(&self, key: &str, value: &str) {
        self.data
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
    }

    /// Raw value currently stored under `key`, bypassing the failure switches.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.data.lock().await.get(key).cloned()
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.data.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.lock().await.is_empty()
    }

    fn injected(&self, what: &str) -> VerisendError {
        VerisendError::store(std::io::Error::other(format!("injected {what} failure")))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, VerisendError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(self.injected("read"));
        }
        Ok(self.data.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), VerisendError> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(self.injected("write"));
        }
        self.data
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), VerisendError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(self.injected("write"));
        }
        self.data.lock().await.remove(key);
        Ok(())
    }

    async fn all_keys(&self) -> Result<Vec<String>, VerisendError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(self.injected("read"));
        }
        Ok(self.data.lock().await.keys().cloned().collect())
    }
}
