// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! RTC MQTT Bridge CLI
//!
//! Offline tooling around the bridge: record conversion, type listing,
//! configuration generation and validation, and a loopback dry run.
//!
//! # Usage
//!
//! ```bash
//! # CDR -> JSON (stdin to stdout)
//! rtc-mqtt-bridge convert --type TimedLong --to json < rec.cdr
//!
//! # JSON -> big-endian CDR
//! rtc-mqtt-bridge convert --type RTC.TimedLong --endian big --to cdr -i rec.json -o rec.cdr
//!
//! # List known types
//! rtc-mqtt-bridge types
//!
//! # Dry run a configuration, overriding the retain flag
//! rtc-mqtt-bridge dry-run --config bridge.toml --input rec.cdr --retain false
//! ```

use clap::{Parser, Subcommand};
use rtc_mqtt_bridge::{
    flag_value, BridgeConfig, BrokerConfig, ConfigOverrides, ConnectionState, LoopbackTransport,
    PayloadFormat, PortStatus, Publisher, Transport,
};
use rtc_reserializer::{resolve_type_name, ByteOrder, Reserializer, TypeRegistry};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// RTC data port <-> MQTT bridge
#[derive(Parser, Debug)]
#[command(name = "rtc-mqtt-bridge")]
#[command(about = "RTC MQTT Bridge - CDR/JSON reserialization for RTC data ports")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error); defaults to the
    /// configuration's `log_level`, then `info`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert one record between CDR and JSON
    Convert {
        /// Data type (RTC.TimedLong, TimedLong, IDL:RTC/TimedLong:1.0)
        #[arg(short, long = "type")]
        type_name: String,

        /// Byte order of the CDR side
        #[arg(short, long, default_value = "little")]
        endian: String,

        /// Output encoding
        #[arg(long, value_enum)]
        to: PayloadFormat,

        /// Input file (stdin when absent)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (stdout when absent)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List registered data types
    Types,

    /// Print the zero-valued JSON record of a type
    Zero {
        /// Data type
        #[arg(short, long = "type")]
        type_name: String,
    },

    /// Generate example configuration file
    GenConfig {
        /// Output file path
        #[arg(short, long, default_value = "bridge.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Run the publisher path over a loopback transport
    DryRun {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,

        /// CDR record file
        #[arg(short, long)]
        input: PathBuf,

        /// Payload encoding, overriding the configuration
        #[arg(long, value_enum)]
        format: Option<PayloadFormat>,

        /// Retain flag (true/false/1/0)
        #[arg(long, action = clap::ArgAction::Set, value_parser = flag_value)]
        retain: Option<bool>,

        /// Register the last will (true/false/1/0)
        #[arg(long, action = clap::ArgAction::Set, value_parser = flag_value)]
        will: Option<bool>,

        /// Clean session (true/false/1/0)
        #[arg(long, action = clap::ArgAction::Set, value_parser = flag_value)]
        clean_session: Option<bool>,
    },
}

impl Args {
    /// `--log-level`, else the configuration file's level, else `info`.
    fn log_level(&self) -> String {
        let config = match &self.command {
            Commands::Validate { config } | Commands::DryRun { config, .. } => Some(config),
            _ => None,
        };
        self.log_level
            .clone()
            .or_else(|| config.and_then(BridgeConfig::read_log_level))
            .unwrap_or_else(|| "info".to_string())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(args.log_level()).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let registry = TypeRegistry::rtc();
    match args.command {
        Commands::Convert {
            type_name,
            endian,
            to,
            input,
            output,
        } => cmd_convert(&registry, &type_name, &endian, to, input, output),
        Commands::Types => cmd_types(&registry),
        Commands::Zero { type_name } => cmd_zero(&registry, &type_name),
        Commands::GenConfig { output } => cmd_gen_config(output),
        Commands::Validate { config } => cmd_validate(&registry, config),
        Commands::DryRun {
            config,
            input,
            format,
            retain,
            will,
            clean_session,
        } => {
            let overrides = ConfigOverrides {
                format,
                retain,
                will,
                clean_session,
            };
            cmd_dry_run(&registry, config, input, overrides)
        }
    }
}

fn read_input(path: Option<&Path>) -> std::io::Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> std::io::Result<()> {
    match path {
        Some(path) => std::fs::write(path, bytes),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()
        }
    }
}

fn cmd_convert(
    registry: &TypeRegistry,
    type_name: &str,
    endian: &str,
    to: PayloadFormat,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let order: ByteOrder = endian.parse()?;
    let reser = Reserializer::from_registry(registry, &resolve_type_name(type_name), order)?;
    let bytes = read_input(input.as_deref())?;

    let converted = match to {
        PayloadFormat::Json => {
            let mut text = reser.binary_to_text(&bytes)?;
            if output.is_none() {
                text.push('\n');
            }
            text.into_bytes()
        }
        PayloadFormat::Cdr => reser.text_slice_to_binary(&bytes)?,
    };

    tracing::debug!(
        "Converted {} bytes of {} into {} bytes",
        bytes.len(),
        reser.type_name(),
        converted.len()
    );
    write_output(output.as_deref(), &converted)?;
    Ok(())
}

fn cmd_types(registry: &TypeRegistry) -> Result<(), Box<dyn std::error::Error>> {
    for name in registry.names() {
        println!("{}", name);
    }
    Ok(())
}

fn cmd_zero(registry: &TypeRegistry, type_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let reser = Reserializer::from_registry(
        registry,
        &resolve_type_name(type_name),
        ByteOrder::Little,
    )?;
    println!("{}", reser.zero_text()?);
    Ok(())
}

fn cmd_gen_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = BridgeConfig {
        name: "example-bridge".into(),
        data_type: "RTC.TimedPose2D".into(),
        topic: "robot/pose".into(),
        qos: 1,
        will: true,
        broker: BrokerConfig {
            client_id: Some("rtc-pose-publisher".into()),
            ..Default::default()
        },
        ..Default::default()
    };

    let toml_str = toml::to_string_pretty(&config)?;

    let content = format!(
        r#"# RTC MQTT Bridge Configuration
# Generated by rtc-mqtt-bridge gen-config

{}
"#,
        toml_str
    );

    std::fs::write(&output, content)?;
    println!("Generated configuration file: {}", output.display());
    Ok(())
}

fn cmd_validate(
    registry: &TypeRegistry,
    config_path: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let result =
        BridgeConfig::from_file(&config_path).and_then(|c| c.validate_against(registry).map(|_| c));
    match result {
        Ok(config) => {
            println!("Configuration valid!");
            println!();
            println!("Bridge: {}", config.name);
            println!(
                "Type:   {} ({} endian)",
                config.qualified_type(),
                config.endian
            );
            println!("Broker: {}:{}", config.broker.host, config.port());
            println!(
                "Topic:  {} (qos {}, {} payload{}{})",
                config.topic,
                config.qos,
                config.format,
                if config.retain { ", retained" } else { "" },
                if config.will { ", last will" } else { "" }
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("Configuration invalid: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_dry_run(
    registry: &TypeRegistry,
    config_path: PathBuf,
    input: PathBuf,
    overrides: ConfigOverrides,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = BridgeConfig::from_file(&config_path)?;
    overrides.apply(&mut config);
    let format = config.format;
    let record = std::fs::read(&input)?;

    let publisher = Publisher::new(config, registry, LoopbackTransport::new())?;
    publisher.start()?;

    if let Some(will) = publisher
        .transport()
        .connect_options()
        .and_then(|o| o.last_will)
    {
        println!("Last will on '{}':", will.topic);
        print_payload(format, &will.payload);
    }

    let status = publisher.put(&record);
    for publication in publisher.transport().take_published() {
        println!(
            "Publish on '{}' (qos {}, retain {}):",
            publication.topic,
            publication.qos.level(),
            publication.retain
        );
        print_payload(format, &publication.payload);
    }
    println!("Port status: {}", status);

    if publisher.transport().state() == ConnectionState::Connected {
        publisher.stop()?;
    }

    if status != PortStatus::Ok {
        std::process::exit(1);
    }
    Ok(())
}

fn print_payload(format: PayloadFormat, payload: &[u8]) {
    if payload.is_empty() {
        println!("  <empty>");
        return;
    }
    match format {
        PayloadFormat::Json => println!("  {}", String::from_utf8_lossy(payload)),
        PayloadFormat::Cdr => println!("  {}", hex(payload)),
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write");
        file
    }

    #[test]
    fn test_log_level_precedence() {
        let config = write_config("log_level = \"debug\"\n");
        let path = config.path().to_str().expect("utf-8 path");

        let args = Args::parse_from(["rtc-mqtt-bridge", "validate", "--config", path]);
        assert_eq!(args.log_level(), "debug");

        let args = Args::parse_from([
            "rtc-mqtt-bridge",
            "--log-level",
            "warn",
            "validate",
            "--config",
            path,
        ]);
        assert_eq!(args.log_level(), "warn");

        let args = Args::parse_from(["rtc-mqtt-bridge", "types"]);
        assert_eq!(args.log_level(), "info");
    }

    #[test]
    fn test_dry_run_overrides() {
        let args = Args::parse_from([
            "rtc-mqtt-bridge",
            "dry-run",
            "-c",
            "bridge.toml",
            "-i",
            "rec.cdr",
            "--format",
            "cdr",
            "--retain",
            "F",
            "--will",
            "1",
        ]);
        match args.command {
            Commands::DryRun {
                format,
                retain,
                will,
                clean_session,
                ..
            } => {
                assert_eq!(format, Some(PayloadFormat::Cdr));
                assert_eq!(retain, Some(false));
                assert_eq!(will, Some(true));
                assert_eq!(clean_session, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Args::try_parse_from([
            "rtc-mqtt-bridge",
            "dry-run",
            "-c",
            "bridge.toml",
            "-i",
            "rec.cdr",
            "--retain",
            "maybe",
        ])
        .is_err());
    }
}
