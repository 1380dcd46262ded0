// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Outbound (data port -> broker) and inbound (broker -> data port) paths.

use crate::config::{BridgeConfig, ConfigError, PayloadFormat};
use crate::port::{DataPort, PortStatus};
use crate::stats::{BridgeStats, BridgeStatsSnapshot};
use crate::transport::{LastWill, Publication, QoS, Transport, TransportError};
use rtc_reserializer::{RegistryError, ReserializeError, Reserializer, TypeRegistry};
use std::sync::Arc;

/// Bridge errors.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Type error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Reserialization error: {0}")]
    Reserialize(#[from] ReserializeError),
}

/// Resolve the configured type and byte order into a reserializer.
fn build_reserializer(
    config: &BridgeConfig,
    registry: &TypeRegistry,
) -> Result<Reserializer, BridgeError> {
    config.validate()?;
    let order = config.byte_order()?;
    Ok(Reserializer::from_registry(
        registry,
        &config.qualified_type(),
        order,
    )?)
}

/// Publishes data port records on an MQTT topic.
pub struct Publisher<T: Transport> {
    config: BridgeConfig,
    reserializer: Reserializer,
    qos: QoS,
    transport: T,
    stats: Arc<BridgeStats>,
}

impl<T: Transport> Publisher<T> {
    /// Create a publisher for the configured data type.
    pub fn new(
        config: BridgeConfig,
        registry: &TypeRegistry,
        transport: T,
    ) -> Result<Self, BridgeError> {
        let reserializer = build_reserializer(&config, registry)?;
        let qos = config.qos_level()?;
        Ok(Self {
            config,
            reserializer,
            qos,
            transport,
            stats: Arc::new(BridgeStats::new()),
        })
    }

    /// Connect to the broker.
    ///
    /// Registers the zero-valued record as last will when enabled, and
    /// clears the retained message on the topic when requested.
    pub fn start(&self) -> Result<(), BridgeError> {
        let last_will = if self.config.will {
            Some(LastWill {
                topic: self.config.topic.clone(),
                payload: self.zero_payload()?,
                qos: self.qos,
                retain: self.config.retain,
            })
        } else {
            None
        };

        let options = self.config.connect_options(last_will);
        tracing::info!(
            "Connecting to {}:{} as '{}' (topic '{}', type {}, {} payload)",
            options.host,
            options.port,
            options.client_id,
            self.config.topic,
            self.reserializer.type_name(),
            self.config.format
        );
        self.transport.connect(&options)?;

        if self.config.clear_retained {
            self.transport.publish(&Publication {
                topic: self.config.topic.clone(),
                payload: Vec::new(),
                qos: self.qos,
                retain: true,
            })?;
            tracing::info!("Cleared retained message on '{}'", self.config.topic);
        }
        Ok(())
    }

    /// Forward one CDR record from the data port.
    pub fn put(&self, cdr: &[u8]) -> PortStatus {
        let payload = match self.config.format {
            PayloadFormat::Json => match self.reserializer.binary_to_text(cdr) {
                Ok(text) => text.into_bytes(),
                Err(e) => {
                    tracing::error!(
                        "Dropping {} record ({} bytes): {}",
                        self.reserializer.type_name(),
                        cdr.len(),
                        e
                    );
                    self.stats.record_conversion_error();
                    return PortStatus::PortError;
                }
            },
            PayloadFormat::Cdr => cdr.to_vec(),
        };

        let len = payload.len() as u64;
        let publication = Publication {
            topic: self.config.topic.clone(),
            payload,
            qos: self.qos,
            retain: self.config.retain,
        };
        match self.transport.publish(&publication) {
            Ok(()) => {
                tracing::debug!("Published {} bytes on '{}'", len, publication.topic);
                self.stats.record_message(len);
                PortStatus::Ok
            }
            Err(e) => {
                tracing::error!("Publish on '{}' failed: {}", publication.topic, e);
                self.stats.record_transport_error();
                PortStatus::ConnectionLost
            }
        }
    }

    /// Disconnect from the broker.
    pub fn stop(&self) -> Result<(), BridgeError> {
        self.transport.disconnect()?;
        let stats = self.stats.snapshot();
        tracing::info!(
            "Disconnected: {} messages, {} bytes, {} errors",
            stats.messages,
            stats.bytes,
            stats.errors()
        );
        Ok(())
    }

    /// Last-will payload: the zero-valued record in the configured format.
    pub fn zero_payload(&self) -> Result<Vec<u8>, BridgeError> {
        Ok(match self.config.format {
            PayloadFormat::Json => self.reserializer.zero_text()?.into_bytes(),
            PayloadFormat::Cdr => self.reserializer.zero_binary()?,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Shared statistics.
    pub fn stats(&self) -> Arc<BridgeStats> {
        self.stats.clone()
    }

    /// Snapshot of the statistics.
    pub fn stats_snapshot(&self) -> BridgeStatsSnapshot {
        self.stats.snapshot()
    }
}

/// Delivers MQTT messages to a data port.
pub struct Subscriber<P: DataPort> {
    format: PayloadFormat,
    reserializer: Reserializer,
    port: P,
    stats: Arc<BridgeStats>,
}

impl<P: DataPort> Subscriber<P> {
    /// Create a subscriber for the configured data type.
    pub fn new(
        config: &BridgeConfig,
        registry: &TypeRegistry,
        port: P,
    ) -> Result<Self, BridgeError> {
        Ok(Self {
            format: config.format,
            reserializer: build_reserializer(config, registry)?,
            port,
            stats: Arc::new(BridgeStats::new()),
        })
    }

    /// Handle one received payload.
    pub fn on_message(&self, payload: &[u8]) -> PortStatus {
        if payload.is_empty() {
            tracing::debug!("Skipping empty payload (cleared retained message)");
            self.stats.record_dropped();
            return PortStatus::Ok;
        }

        let cdr = match self.format {
            PayloadFormat::Json => match self.reserializer.text_slice_to_binary(payload) {
                Ok(cdr) => cdr,
                Err(e) => {
                    tracing::error!(
                        "Dropping message for {} ({} bytes): {}",
                        self.reserializer.type_name(),
                        payload.len(),
                        e
                    );
                    self.stats.record_conversion_error();
                    return PortStatus::PortError;
                }
            },
            PayloadFormat::Cdr => payload.to_vec(),
        };

        let status = self.port.write(&cdr);
        if status.is_ok() {
            tracing::debug!("Delivered {} bytes to data port", cdr.len());
            self.stats.record_message(cdr.len() as u64);
        } else {
            tracing::warn!("Data port rejected record: {}", status);
            self.stats.record_port_error();
        }
        status
    }

    /// Underlying data port.
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Shared statistics.
    pub fn stats(&self) -> Arc<BridgeStats> {
        self.stats.clone()
    }

    /// Snapshot of the statistics.
    pub fn stats_snapshot(&self) -> BridgeStatsSnapshot {
        self.stats.snapshot()
    }
}
