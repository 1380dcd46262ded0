// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Middleware data port seam.

use parking_lot::Mutex;
use std::fmt;

/// Result of handing a record to a data port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortStatus {
    Ok,
    PortError,
    BufferFull,
    BufferEmpty,
    BufferTimeout,
    PreconditionNotMet,
    ConnectionLost,
    UnknownError,
}

impl PortStatus {
    /// Returns `true` for [`PortStatus::Ok`].
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "PORT_OK",
            Self::PortError => "PORT_ERROR",
            Self::BufferFull => "BUFFER_FULL",
            Self::BufferEmpty => "BUFFER_EMPTY",
            Self::BufferTimeout => "BUFFER_TIMEOUT",
            Self::PreconditionNotMet => "PRECONDITION_NOT_MET",
            Self::ConnectionLost => "CONNECTION_LOST",
            Self::UnknownError => "UNKNOWN_ERROR",
        };
        f.write_str(name)
    }
}

/// Inbound side of a middleware data port: accepts CDR records.
pub trait DataPort: Send + Sync {
    /// Deliver one CDR-encoded record.
    fn write(&self, cdr: &[u8]) -> PortStatus;
}

/// In-memory data port that keeps every accepted record.
#[derive(Debug)]
pub struct CollectingPort {
    records: Mutex<Vec<Vec<u8>>>,
    status: Mutex<PortStatus>,
}

impl Default for CollectingPort {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectingPort {
    /// Create an empty port that accepts everything.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            status: Mutex::new(PortStatus::Ok),
        }
    }

    /// Status returned by subsequent writes; non-`Ok` writes are not kept.
    pub fn set_status(&self, status: PortStatus) {
        *self.status.lock() = status;
    }

    /// Records accepted so far, oldest first.
    pub fn records(&self) -> Vec<Vec<u8>> {
        self.records.lock().clone()
    }

    /// Number of accepted records.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns `true` if nothing was accepted.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl DataPort for CollectingPort {
    fn write(&self, cdr: &[u8]) -> PortStatus {
        let status = *self.status.lock();
        if status.is_ok() {
            self.records.lock().push(cdr.to_vec());
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_port() {
        let port = CollectingPort::new();
        assert!(port.is_empty());

        assert_eq!(port.write(&[1, 2]), PortStatus::Ok);
        port.set_status(PortStatus::BufferFull);
        assert_eq!(port.write(&[3]), PortStatus::BufferFull);

        assert_eq!(port.records(), vec![vec![1, 2]]);
        assert_eq!(port.len(), 1);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(PortStatus::BufferTimeout.to_string(), "BUFFER_TIMEOUT");
        assert_eq!(PortStatus::ConnectionLost.to_string(), "CONNECTION_LOST");
    }
}
