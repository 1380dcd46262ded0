// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bridge statistics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Counters for one bridge direction.
#[derive(Debug)]
pub struct BridgeStats {
    /// Messages successfully forwarded.
    pub messages: AtomicU64,

    /// Payload bytes forwarded.
    pub bytes: AtomicU64,

    /// Messages dropped on purpose (empty payloads).
    pub dropped: AtomicU64,

    /// Messages that failed to reserialize.
    pub conversion_errors: AtomicU64,

    /// Publishes rejected by the transport.
    pub transport_errors: AtomicU64,

    /// Writes rejected by the data port.
    pub port_errors: AtomicU64,

    /// Creation time.
    pub created: Instant,
}

impl Default for BridgeStats {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeStats {
    /// Create zeroed stats.
    pub fn new() -> Self {
        Self {
            messages: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            conversion_errors: AtomicU64::new(0),
            transport_errors: AtomicU64::new(0),
            port_errors: AtomicU64::new(0),
            created: Instant::now(),
        }
    }

    /// Record a forwarded message.
    pub fn record_message(&self, bytes: u64) {
        self.messages.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a dropped message.
    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a reserialization failure.
    pub fn record_conversion_error(&self) {
        self.conversion_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a transport failure.
    pub fn record_transport_error(&self) {
        self.transport_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a data port rejection.
    pub fn record_port_error(&self) {
        self.port_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of current stats.
    pub fn snapshot(&self) -> BridgeStatsSnapshot {
        BridgeStatsSnapshot {
            messages: self.messages.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            conversion_errors: self.conversion_errors.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            port_errors: self.port_errors.load(Ordering::Relaxed),
            uptime_secs: self.created.elapsed().as_secs(),
        }
    }
}

/// Snapshot of bridge statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeStatsSnapshot {
    pub messages: u64,
    pub bytes: u64,
    pub dropped: u64,
    pub conversion_errors: u64,
    pub transport_errors: u64,
    pub port_errors: u64,
    pub uptime_secs: u64,
}

impl BridgeStatsSnapshot {
    /// Total failed messages.
    pub fn errors(&self) -> u64 {
        self.conversion_errors + self.transport_errors + self.port_errors
    }

    /// Calculate messages per second.
    pub fn messages_per_second(&self) -> f64 {
        if self.uptime_secs > 0 {
            self.messages as f64 / self.uptime_secs as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = BridgeStats::new();
        stats.record_message(12);
        stats.record_message(20);
        stats.record_dropped();
        stats.record_conversion_error();
        stats.record_transport_error();
        stats.record_port_error();

        let snap = stats.snapshot();
        assert_eq!(snap.messages, 2);
        assert_eq!(snap.bytes, 32);
        assert_eq!(snap.dropped, 1);
        assert_eq!(snap.errors(), 3);
    }

    #[test]
    fn test_rate_without_uptime() {
        let snap = BridgeStatsSnapshot {
            messages: 10,
            ..Default::default()
        };
        assert_eq!(snap.messages_per_second(), 0.0);
    }
}
