// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bridge configuration.
//!
//! Loaded from TOML. Out-of-range numeric settings fall back to their
//! defaults with a warning; structurally invalid settings are errors.

use crate::transport::{ConnectOptions, LastWill, QoS};
use rtc_reserializer::{resolve_type_name, ByteOrder, TypeRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Plain MQTT port.
pub const DEFAULT_PORT: u16 = 1883;
/// MQTT over TLS port.
pub const DEFAULT_TLS_PORT: u16 = 8883;

const MAX_KEEPALIVE_SECS: u64 = 86_400;
const MAX_INFLIGHT: u32 = 65_535;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Encoding of the MQTT payload.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    /// `{"RTC.<Type>": {...}}` JSON text.
    #[default]
    Json,
    /// Raw CDR bytes, passed through unchanged.
    Cdr,
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Cdr => f.write_str("cdr"),
        }
    }
}

/// Bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Bridge name (for identification).
    #[serde(default = "default_bridge_name")]
    pub name: String,

    /// Data type of the port (`RTC.TimedLong`, `IDL:RTC/TimedLong:1.0`, `TimedLong`).
    #[serde(default = "default_data_type")]
    pub data_type: String,

    /// Byte order of the data port (`little`, `big`, or a list such as `little,big`).
    #[serde(default = "default_endian")]
    pub endian: String,

    /// MQTT payload encoding.
    #[serde(default)]
    pub format: PayloadFormat,

    /// MQTT topic.
    #[serde(default = "default_topic")]
    pub topic: String,

    /// MQTT QoS level (0, 1 or 2).
    #[serde(default)]
    pub qos: u8,

    /// Publish with the retain flag.
    #[serde(default)]
    pub retain: bool,

    /// Register the zero-valued record as last will.
    #[serde(default)]
    pub will: bool,

    /// Clear the retained message on the topic at start.
    #[serde(default)]
    pub clear_retained: bool,

    /// Log level, used when `--log-level` is not given.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Broker connection.
    #[serde(default)]
    pub broker: BrokerConfig,

    /// TLS settings, passed through to the transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,
}

/// Broker connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Broker host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Broker port (1883, or 8883 with TLS, when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Keepalive interval (seconds).
    #[serde(default = "default_keepalive")]
    pub keepalive_secs: u64,

    /// Client identifier (random when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Start with a clean session.
    #[serde(default = "default_true")]
    pub clean_session: bool,

    /// Maximum in-flight messages for QoS > 0.
    #[serde(default = "default_max_inflight")]
    pub max_inflight: u32,
}

/// TLS file locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    /// CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Client certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_cert: Option<PathBuf>,

    /// Client private key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key: Option<PathBuf>,
}

fn default_bridge_name() -> String {
    "rtc-mqtt-bridge".to_string()
}

fn default_data_type() -> String {
    "RTC.TimedLong".to_string()
}

fn default_endian() -> String {
    "little".to_string()
}

fn default_topic() -> String {
    "test".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_keepalive() -> u64 {
    60
}

fn default_max_inflight() -> u32 {
    20
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
            keepalive_secs: default_keepalive(),
            client_id: None,
            clean_session: true,
            max_inflight: default_max_inflight(),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            name: default_bridge_name(),
            data_type: default_data_type(),
            endian: default_endian(),
            format: PayloadFormat::Json,
            broker: BrokerConfig::default(),
            topic: default_topic(),
            qos: 0,
            retain: false,
            will: false,
            clear_retained: false,
            tls: None,
            log_level: default_log_level(),
        }
    }
}

impl BridgeConfig {
    /// Load, normalize and validate a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// `log_level` of a configuration file, read before logging starts.
    ///
    /// Returns `None` when the file cannot be read or parsed; `from_file`
    /// reports those errors.
    pub fn read_log_level<P: AsRef<Path>>(path: P) -> Option<String> {
        let content = std::fs::read_to_string(path).ok()?;
        toml::from_str::<Self>(&content).ok().map(|c| c.log_level)
    }

    /// Create a configuration for one data type and topic.
    pub fn new(data_type: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            topic: topic.into(),
            ..Default::default()
        }
    }

    /// Reset out-of-range numeric settings to their defaults.
    pub fn normalize(&mut self) {
        if self.broker.port == Some(0) {
            tracing::warn!("Port 0 is invalid, using the default port");
            self.broker.port = None;
        }
        if self.broker.keepalive_secs > MAX_KEEPALIVE_SECS {
            tracing::warn!(
                "Keepalive {}s out of range (0-{}), using {}s",
                self.broker.keepalive_secs,
                MAX_KEEPALIVE_SECS,
                default_keepalive()
            );
            self.broker.keepalive_secs = default_keepalive();
        }
        if QoS::from_level(self.qos).is_none() {
            tracing::warn!("QoS {} out of range (0-2), using 0", self.qos);
            self.qos = 0;
        }
        if self.broker.max_inflight > MAX_INFLIGHT {
            tracing::warn!(
                "Max inflight {} out of range (0-{}), using {}",
                self.broker.max_inflight,
                MAX_INFLIGHT,
                default_max_inflight()
            );
            self.broker.max_inflight = default_max_inflight();
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker.host.trim().is_empty() {
            return Err(ConfigError::Invalid("Broker host is empty".into()));
        }
        if self.topic.is_empty() {
            return Err(ConfigError::Invalid("Topic is empty".into()));
        }
        if self.data_type.trim().is_empty() {
            return Err(ConfigError::Invalid("Data type is empty".into()));
        }
        self.byte_order()?;
        self.qos_level()?;

        if let Some(tls) = &self.tls {
            if tls.ca_cert.as_ref().is_none_or(|p| p.as_os_str().is_empty()) {
                return Err(ConfigError::Invalid(
                    "TLS section requires a CA certificate path".into(),
                ));
            }
            if tls.client_cert.is_some() != tls.client_key.is_some() {
                return Err(ConfigError::Invalid(
                    "TLS client certificate and key must be given together".into(),
                ));
            }
        }

        Ok(())
    }

    /// Validate, and check that the data type is registered.
    pub fn validate_against(&self, registry: &TypeRegistry) -> Result<(), ConfigError> {
        self.validate()?;
        let name = self.qualified_type();
        if !registry.contains(&name) {
            return Err(ConfigError::Invalid(format!(
                "Unknown data type '{}' (resolved to '{}')",
                self.data_type, name
            )));
        }
        Ok(())
    }

    /// Registry name of the configured data type.
    pub fn qualified_type(&self) -> String {
        resolve_type_name(&self.data_type)
    }

    /// Parsed byte order.
    pub fn byte_order(&self) -> Result<ByteOrder, ConfigError> {
        self.endian
            .parse::<ByteOrder>()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Parsed QoS level.
    pub fn qos_level(&self) -> Result<QoS, ConfigError> {
        QoS::from_level(self.qos)
            .ok_or_else(|| ConfigError::Invalid(format!("QoS {} out of range (0-2)", self.qos)))
    }

    /// Effective broker port.
    pub fn port(&self) -> u16 {
        match (self.broker.port, &self.tls) {
            (Some(port), _) => port,
            (None, Some(_)) => DEFAULT_TLS_PORT,
            (None, None) => DEFAULT_PORT,
        }
    }

    /// Transport connection options.
    pub fn connect_options(&self, last_will: Option<LastWill>) -> ConnectOptions {
        ConnectOptions {
            host: self.broker.host.clone(),
            port: self.port(),
            keepalive: Duration::from_secs(self.broker.keepalive_secs),
            client_id: self
                .broker
                .client_id
                .clone()
                .filter(|id| !id.is_empty())
                .unwrap_or_else(random_client_id),
            clean_session: self.broker.clean_session,
            max_inflight: u16::try_from(self.broker.max_inflight).unwrap_or(u16::MAX),
            tls: self.tls.clone(),
            last_will,
        }
    }
}

fn random_client_id() -> String {
    let suffix: String = std::iter::repeat_with(fastrand::alphanumeric)
        .take(12)
        .collect();
    format!("rtc-bridge-{}", suffix)
}

/// Parse a boolean property value.
///
/// Accepts `true/True/TRUE/t/T/1` and `false/False/FALSE/f/F/0`.
pub fn parse_flag(s: &str) -> Option<bool> {
    match s.trim() {
        "true" | "True" | "TRUE" | "t" | "T" | "1" => Some(true),
        "false" | "False" | "FALSE" | "f" | "F" | "0" => Some(false),
        _ => None,
    }
}

/// [`parse_flag`] as a command-line value parser.
pub fn flag_value(s: &str) -> Result<bool, ConfigError> {
    parse_flag(s).ok_or_else(|| {
        ConfigError::Invalid(format!("'{}' is not a flag (expected true/false/1/0)", s))
    })
}

/// Command-line settings that take precedence over the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub format: Option<PayloadFormat>,
    pub retain: Option<bool>,
    pub will: Option<bool>,
    pub clean_session: Option<bool>,
}

impl ConfigOverrides {
    /// Overwrite the settings given on the command line.
    pub fn apply(&self, config: &mut BridgeConfig) {
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(retain) = self.retain {
            config.retain = retain;
        }
        if let Some(will) = self.will {
            config.will = will;
        }
        if let Some(clean_session) = self.clean_session {
            config.broker.clean_session = clean_session;
        }
    }
}
