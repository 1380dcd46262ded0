// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! RTC Data Port <-> MQTT Bridge
//!
//! Forwards RTC data port records to MQTT topics and back, converting
//! between the port's CDR encoding and wrapped JSON on the way.
//!
//! # Features
//!
//! - **Publisher**: Data port -> broker, with last will and retained-message clearing
//! - **Subscriber**: Broker -> data port, dropping malformed payloads
//! - **Payload Formats**: `json` (reserialized) or `cdr` (passed through)
//! - **Seams**: [`Transport`] and [`DataPort`] traits, so any MQTT client or
//!   middleware binding can be plugged in
//!
//! # Quick Start
//!
//! ```bash
//! # Convert a CDR record to JSON
//! rtc-mqtt-bridge convert --type TimedPose2D --to json --input pose.cdr
//!
//! # Print the last-will payload of a type
//! rtc-mqtt-bridge zero --type RTC.TimedLong
//!
//! # Check what a configuration would publish
//! rtc-mqtt-bridge dry-run --config bridge.toml --input pose.cdr
//! ```
//!
//! # Configuration File
//!
//! ```toml
//! data_type = "RTC.TimedPose2D"
//! endian = "little"
//! format = "json"
//! topic = "robot/pose"
//! qos = 1
//! will = true
//!
//! [broker]
//! host = "broker.local"
//! keepalive_secs = 60
//! ```

pub mod bridge;
pub mod config;
pub mod port;
pub mod stats;
pub mod transport;

pub use bridge::{BridgeError, Publisher, Subscriber};
pub use config::{
    flag_value, parse_flag, BridgeConfig, BrokerConfig, ConfigError, ConfigOverrides,
    PayloadFormat, TlsConfig,
};
pub use port::{CollectingPort, DataPort, PortStatus};
pub use stats::{BridgeStats, BridgeStatsSnapshot};
pub use transport::{
    ConnectOptions, ConnectionState, LastWill, LoopbackTransport, Publication, QoS, Transport,
    TransportError,
};
