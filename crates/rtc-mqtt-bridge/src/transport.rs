// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! MQTT transport seam.
//!
//! The bridge never speaks MQTT itself; it drives a [`Transport`] and
//! relies on it for sessions, QoS delivery, retain and TLS. Connection
//! state is owned by the transport as an explicit [`ConnectionState`].

use crate::config::TlsConfig;
use parking_lot::Mutex;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// MQTT delivery guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QoS {
    AtMostOnce,
    AtLeastOnce,
    ExactlyOnce,
}

impl QoS {
    /// Map a numeric level (0, 1, 2).
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::AtMostOnce),
            1 => Some(Self::AtLeastOnce),
            2 => Some(Self::ExactlyOnce),
            _ => None,
        }
    }

    /// Numeric level.
    pub fn level(&self) -> u8 {
        match self {
            Self::AtMostOnce => 0,
            Self::AtLeastOnce => 1,
            Self::ExactlyOnce => 2,
        }
    }
}

/// Connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnecting => "disconnecting",
        };
        f.write_str(name)
    }
}

/// Message the broker publishes if the client vanishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastWill {
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: QoS,
    pub retain: bool,
}

/// Connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    pub keepalive: Duration,
    pub client_id: String,
    pub clean_session: bool,
    /// Only meaningful for QoS > 0.
    pub max_inflight: u16,
    pub tls: Option<TlsConfig>,
    pub last_will: Option<LastWill>,
}

/// One outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: QoS,
    pub retain: bool,
}

/// Transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("not connected (state: {0})")]
    NotConnected(ConnectionState),

    #[error("cannot {operation} while {state}")]
    InvalidState {
        state: ConnectionState,
        operation: &'static str,
    },

    #[error("connect failed: {0}")]
    ConnectFailed(String),

    #[error("publish failed: {0}")]
    PublishFailed(String),
}

/// An MQTT client, as seen by the bridge.
pub trait Transport: Send + Sync {
    /// Open a session. Moves `Disconnected -> Connecting -> Connected`.
    fn connect(&self, options: &ConnectOptions) -> Result<(), TransportError>;

    /// Publish one message. Requires `Connected`.
    fn publish(&self, publication: &Publication) -> Result<(), TransportError>;

    /// Close the session. Moves `Connected -> Disconnecting -> Disconnected`.
    fn disconnect(&self) -> Result<(), TransportError>;

    /// Current connection state.
    fn state(&self) -> ConnectionState;
}

#[derive(Debug)]
struct LoopbackInner {
    state: ConnectionState,
    options: Option<ConnectOptions>,
    published: Vec<Publication>,
    fail_publish: bool,
}

/// In-memory transport that records everything it is asked to send.
#[derive(Debug)]
pub struct LoopbackTransport {
    inner: Mutex<LoopbackInner>,
}

impl Default for LoopbackTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackTransport {
    /// Create a disconnected loopback transport.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LoopbackInner {
                state: ConnectionState::Disconnected,
                options: None,
                published: Vec::new(),
                fail_publish: false,
            }),
        }
    }

    /// Messages published so far, oldest first.
    pub fn published(&self) -> Vec<Publication> {
        self.inner.lock().published.clone()
    }

    /// Drain the published messages.
    pub fn take_published(&self) -> Vec<Publication> {
        std::mem::take(&mut self.inner.lock().published)
    }

    /// Options of the last successful connect.
    pub fn connect_options(&self) -> Option<ConnectOptions> {
        self.inner.lock().options.clone()
    }

    /// Make subsequent publishes fail.
    pub fn set_fail_publish(&self, fail: bool) {
        self.inner.lock().fail_publish = fail;
    }

    /// Drop the session without a clean disconnect.
    pub fn drop_connection(&self) {
        self.inner.lock().state = ConnectionState::Disconnected;
    }
}

impl Transport for LoopbackTransport {
    fn connect(&self, options: &ConnectOptions) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        if inner.state != ConnectionState::Disconnected {
            return Err(TransportError::InvalidState {
                state: inner.state,
                operation: "connect",
            });
        }
        if options.host.is_empty() {
            return Err(TransportError::ConnectFailed("empty host".into()));
        }
        inner.state = ConnectionState::Connecting;
        inner.options = Some(options.clone());
        inner.state = ConnectionState::Connected;
        Ok(())
    }

    fn publish(&self, publication: &Publication) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        if inner.state != ConnectionState::Connected {
            return Err(TransportError::NotConnected(inner.state));
        }
        if inner.fail_publish {
            return Err(TransportError::PublishFailed("injected failure".into()));
        }
        inner.published.push(publication.clone());
        Ok(())
    }

    fn disconnect(&self) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        if inner.state != ConnectionState::Connected {
            return Err(TransportError::InvalidState {
                state: inner.state,
                operation: "disconnect",
            });
        }
        inner.state = ConnectionState::Disconnecting;
        inner.state = ConnectionState::Disconnected;
        Ok(())
    }

    fn state(&self) -> ConnectionState {
        self.inner.lock().state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ConnectOptions {
        ConnectOptions {
            host: "localhost".into(),
            port: 1883,
            keepalive: Duration::from_secs(60),
            client_id: "test".into(),
            clean_session: true,
            max_inflight: 20,
            tls: None,
            last_will: None,
        }
    }

    fn publication(payload: &[u8]) -> Publication {
        Publication {
            topic: "test".into(),
            payload: payload.to_vec(),
            qos: QoS::AtMostOnce,
            retain: false,
        }
    }

    #[test]
    fn test_qos_levels() {
        for level in 0..=2 {
            assert_eq!(QoS::from_level(level).map(|q| q.level()), Some(level));
        }
        assert_eq!(QoS::from_level(3), None);
    }

    #[test]
    fn test_lifecycle() {
        let transport = LoopbackTransport::new();
        assert_eq!(transport.state(), ConnectionState::Disconnected);

        transport.connect(&options()).expect("connect");
        assert_eq!(transport.state(), ConnectionState::Connected);
        assert_eq!(
            transport.connect(&options()),
            Err(TransportError::InvalidState {
                state: ConnectionState::Connected,
                operation: "connect"
            })
        );

        transport.disconnect().expect("disconnect");
        assert_eq!(transport.state(), ConnectionState::Disconnected);
        assert!(transport.disconnect().is_err());
    }

    #[test]
    fn test_publish_requires_connection() {
        let transport = LoopbackTransport::new();
        assert_eq!(
            transport.publish(&publication(b"x")),
            Err(TransportError::NotConnected(ConnectionState::Disconnected))
        );

        transport.connect(&options()).expect("connect");
        transport.publish(&publication(b"a")).expect("publish");
        transport.publish(&publication(b"b")).expect("publish");

        let payloads: Vec<_> = transport
            .take_published()
            .into_iter()
            .map(|p| p.payload)
            .collect();
        assert_eq!(payloads, vec![b"a".to_vec(), b"b".to_vec()]);
        assert!(transport.published().is_empty());
    }

    #[test]
    fn test_injected_failure_and_drop() {
        let transport = LoopbackTransport::new();
        transport.connect(&options()).expect("connect");

        transport.set_fail_publish(true);
        assert!(matches!(
            transport.publish(&publication(b"x")),
            Err(TransportError::PublishFailed(_))
        ));

        transport.set_fail_publish(false);
        transport.drop_connection();
        assert!(matches!(
            transport.publish(&publication(b"x")),
            Err(TransportError::NotConnected(_))
        ));
    }
}
