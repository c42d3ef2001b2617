// SPDX-FileCopyrightText: 2026 Verisend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock network probes for scripting connectivity in tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use verisend_core::{NetworkProbe, NetworkState, Transport};

/// A probe that reports one settable state.
pub struct StaticProbe {
    state: Mutex<NetworkState>,
}

impl StaticProbe {
    pub fn new(state: NetworkState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Probe reporting a healthy wifi connection.
    pub fn online() -> Self {
        Self::new(NetworkState::up(Transport::Wifi))
    }

    /// Probe reporting no connectivity at all.
    pub fn offline() -> Self {
        Self::new(NetworkState::down())
    }

    /// Replaces the reported state; takes effect on the next poll.
    pub fn set(&self, state: NetworkState) {
        *self.state.lock().unwrap() = state;
    }
}

#[async_trait]
impl NetworkProbe for StaticProbe {
    async fn current(&self) -> NetworkState {
        *self.state.lock().unwrap()
    }
}

/// A probe that replays a scripted sequence of states.
///
/// States are consumed front to back; the final state repeats once the
/// script runs out. Useful for "offline for N polls, then online" cases.
pub struct SequenceProbe {
    states: Mutex<VecDeque<NetworkState>>,
}

impl SequenceProbe {
    pub fn new(states: Vec<NetworkState>) -> Self {
        Self {
            states: Mutex::new(VecDeque::from(states)),
        }
    }

    /// Sequence that stays down for `polls` probe calls, then comes up on wifi.
    pub fn down_for(polls: usize) -> Self {
        let mut states = vec![NetworkState::down(); polls];
        states.push(NetworkState::up(Transport::Wifi));
        Self::new(states)
    }
}

#[async_trait]
impl NetworkProbe for SequenceProbe {
    async fn current(&self) -> NetworkState {
        let mut states = self.states.lock().unwrap();
        if states.len() > 1 {
            states.pop_front().unwrap_or_else(NetworkState::down)
        } else {
            states.front().copied().unwrap_or_else(NetworkState::down)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sequence_probe_repeats_last_state() {
        let probe = SequenceProbe::down_for(2);
        assert!(!probe.current().await.online());
        assert!(!probe.current().await.online());
        assert!(probe.current().await.online());
        // Exhausted script keeps reporting the final state.
        assert!(probe.current().await.online());
    }

    #[tokio::test]
    async fn static_probe_reflects_set() {
        let probe = StaticProbe::offline();
        assert!(!probe.current().await.online());
        probe.set(NetworkState::up(Transport::Cellular));
        assert!(probe.current().await.online());
    }
}
