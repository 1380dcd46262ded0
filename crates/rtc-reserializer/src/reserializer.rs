// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary <-> text reserialization facade.
//!
//! ```text
//! binary -> cdr::decode -> tree::flatten -> text::serialize -> text
//! text   -> text::deserialize -> name check -> tree::build -> cdr::encode -> binary
//! ```

use crate::cdr::{self, ByteOrder, CdrError};
use crate::text::{self, TextError};
use crate::tree::{self, TextTree, TreeError};
use crate::types::{RegistryError, TypeDescriptor, TypeRegistry};
use crate::value::Record;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Pipeline stage at which a conversion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    BinaryDecode,
    BinaryEncode,
    TextEncode,
    TextDecode,
    TypeCheck,
    Build,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BinaryDecode => "binary decode",
            Self::BinaryEncode => "binary encode",
            Self::TextEncode => "text encode",
            Self::TextDecode => "text decode",
            Self::TypeCheck => "type check",
            Self::Build => "build",
        };
        f.write_str(name)
    }
}

/// Underlying cause of a conversion failure.
#[derive(Debug, Error)]
pub enum Cause {
    #[error(transparent)]
    Cdr(#[from] CdrError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Text(#[from] TextError),

    #[error("payload is tagged '{found}', expected '{expected}'")]
    TypeMismatch { expected: String, found: String },
}

/// A conversion failure and the stage that raised it.
#[derive(Debug, Error)]
#[error("{stage} failed: {cause}")]
pub struct ReserializeError {
    pub stage: Stage,
    #[source]
    pub cause: Cause,
}

impl ReserializeError {
    fn new(stage: Stage, cause: impl Into<Cause>) -> Self {
        Self {
            stage,
            cause: cause.into(),
        }
    }
}

/// Convert a CDR buffer to wrapped JSON text.
pub fn binary_to_text(
    bytes: &[u8],
    descriptor: &Arc<TypeDescriptor>,
    order: ByteOrder,
) -> Result<String, ReserializeError> {
    let record = cdr::decode(bytes, descriptor, order)
        .map_err(|e| ReserializeError::new(Stage::BinaryDecode, e))?;
    record_to_text(&record)
}

/// Convert wrapped JSON text to a CDR buffer.
pub fn text_to_binary(
    text: &str,
    descriptor: &Arc<TypeDescriptor>,
    order: ByteOrder,
) -> Result<Vec<u8>, ReserializeError> {
    let (name, tree) =
        text::deserialize(text).map_err(|e| ReserializeError::new(Stage::TextDecode, e))?;
    tree_to_binary(&name, &tree, descriptor, order)
}

fn record_to_text(record: &Record) -> Result<String, ReserializeError> {
    let tree = tree::flatten(record.value());
    text::serialize(&tree, record.type_name())
        .map_err(|e| ReserializeError::new(Stage::TextEncode, e))
}

fn tree_to_binary(
    name: &str,
    tree: &TextTree,
    descriptor: &Arc<TypeDescriptor>,
    order: ByteOrder,
) -> Result<Vec<u8>, ReserializeError> {
    if name != descriptor.name {
        return Err(ReserializeError::new(
            Stage::TypeCheck,
            Cause::TypeMismatch {
                expected: descriptor.name.clone(),
                found: name.to_string(),
            },
        ));
    }
    let record =
        tree::build(tree, descriptor).map_err(|e| ReserializeError::new(Stage::Build, e))?;
    cdr::encode(&record, order).map_err(|e| ReserializeError::new(Stage::BinaryEncode, e))
}

/// Reserializer bound to one record type and byte order.
///
/// Immutable after construction; share it freely across threads.
#[derive(Debug, Clone)]
pub struct Reserializer {
    descriptor: Arc<TypeDescriptor>,
    order: ByteOrder,
}

impl Reserializer {
    /// Create a reserializer for a type descriptor.
    pub fn new(descriptor: Arc<TypeDescriptor>, order: ByteOrder) -> Self {
        Self { descriptor, order }
    }

    /// Create a reserializer for a registered type.
    pub fn from_registry(
        registry: &TypeRegistry,
        name: &str,
        order: ByteOrder,
    ) -> Result<Self, RegistryError> {
        Ok(Self::new(registry.get(name)?, order))
    }

    /// Qualified name of the bound type.
    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    /// Bound byte order.
    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Bound type descriptor.
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// Convert a CDR buffer to wrapped JSON text.
    pub fn binary_to_text(&self, bytes: &[u8]) -> Result<String, ReserializeError> {
        binary_to_text(bytes, &self.descriptor, self.order)
    }

    /// Convert wrapped JSON text to a CDR buffer.
    pub fn text_to_binary(&self, text: &str) -> Result<Vec<u8>, ReserializeError> {
        text_to_binary(text, &self.descriptor, self.order)
    }

    /// Convert a raw JSON payload to a CDR buffer.
    pub fn text_slice_to_binary(&self, bytes: &[u8]) -> Result<Vec<u8>, ReserializeError> {
        let (name, tree) = text::deserialize_slice(bytes)
            .map_err(|e| ReserializeError::new(Stage::TextDecode, e))?;
        tree_to_binary(&name, &tree, &self.descriptor, self.order)
    }

    /// JSON text of the zero-valued record.
    pub fn zero_text(&self) -> Result<String, ReserializeError> {
        record_to_text(&Record::zero(&self.descriptor))
    }

    /// CDR encoding of the zero-valued record.
    pub fn zero_binary(&self) -> Result<Vec<u8>, ReserializeError> {
        cdr::encode(&Record::zero(&self.descriptor), self.order)
            .map_err(|e| ReserializeError::new(Stage::BinaryEncode, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed_long(order: ByteOrder) -> Reserializer {
        Reserializer::from_registry(&TypeRegistry::rtc(), "RTC.TimedLong", order)
            .expect("registered")
    }

    #[test]
    fn test_binary_to_text() {
        let reser = timed_long(ByteOrder::Little);
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1700000000u32.to_le_bytes());
        bytes.extend_from_slice(&5u32.to_le_bytes());
        bytes.extend_from_slice(&(-42i32).to_le_bytes());

        let text = reser.binary_to_text(&bytes).expect("convert");
        assert_eq!(
            text,
            r#"{"RTC.TimedLong":{"tm":{"sec":1700000000,"nsec":5},"data":-42}}"#
        );
        assert_eq!(reser.text_to_binary(&text).expect("convert"), bytes);
    }

    #[test]
    fn test_stage_reported() {
        let reser = timed_long(ByteOrder::Big);

        let err = reser.binary_to_text(&[0u8; 3]).unwrap_err();
        assert_eq!(err.stage, Stage::BinaryDecode);
        assert!(matches!(err.cause, Cause::Cdr(CdrError::TruncatedBuffer { .. })));

        let err = reser.text_to_binary("not json").unwrap_err();
        assert_eq!(err.stage, Stage::TextDecode);

        let err = reser
            .text_to_binary(r#"{"RTC.TimedShort":{"tm":{"sec":0,"nsec":0},"data":1}}"#)
            .unwrap_err();
        assert_eq!(err.stage, Stage::TypeCheck);
        assert!(matches!(
            err.cause,
            Cause::TypeMismatch { ref found, .. } if found == "RTC.TimedShort"
        ));

        let err = reser
            .text_slice_to_binary(br#"{"RTC.TimedLong":{"tm":{"sec":0,"nsec":0}}}"#)
            .unwrap_err();
        assert_eq!(err.stage, Stage::Build);
        assert_eq!(err.to_string(), "build failed: missing field 'data'");
    }

    #[test]
    fn test_zero_payloads() {
        let reser = timed_long(ByteOrder::Little);
        assert_eq!(
            reser.zero_text().expect("zero"),
            r#"{"RTC.TimedLong":{"tm":{"sec":0,"nsec":0},"data":0}}"#
        );
        assert_eq!(reser.zero_binary().expect("zero"), vec![0u8; 12]);
    }

    #[test]
    fn test_unknown_type() {
        let err = Reserializer::from_registry(&TypeRegistry::rtc(), "RTC.Nope", ByteOrder::Little)
            .unwrap_err();
        assert_eq!(err, RegistryError::UnknownType("RTC.Nope".into()));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Reserializer>();
        assert_send_sync::<TypeRegistry>();
    }
}
