// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! RTC Record Reserializer
//!
//! Lossless conversion of RTC data port records between CDR and JSON,
//! driven by runtime type descriptors instead of per-type converters.
//!
//! # Features
//!
//! - **TypeRegistry**: Explicit name -> descriptor mapping with the full RTC catalogue
//! - **CDR Codec**: Byte-order-explicit encode/decode of any described record
//! - **Tree Converter**: One recursive flatten/build pair for every type
//! - **Text Codec**: `{"RTC.TimedPose2D": {...}}` wrapped JSON
//! - **Reserializer**: Binary <-> text facade with stage-tagged errors
//!
//! # Example
//!
//! ```rust
//! use rtc_reserializer::{ByteOrder, Reserializer, TypeRegistry};
//!
//! let registry = TypeRegistry::rtc();
//! let reser = Reserializer::from_registry(&registry, "RTC.TimedShortSeq", ByteOrder::Little)?;
//!
//! let text = r#"{"RTC.TimedShortSeq":{"tm":{"sec":1,"nsec":0},"data":[1,2,3]}}"#;
//! let cdr = reser.text_to_binary(text)?;
//! assert_eq!(reser.binary_to_text(&cdr)?, text);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cdr;
pub mod reserializer;
pub mod text;
pub mod tree;
pub mod types;
pub mod value;

pub use cdr::{ByteOrder, CdrError, ParseByteOrderError};
pub use reserializer::{
    binary_to_text, text_to_binary, Cause, ReserializeError, Reserializer, Stage,
};
pub use text::TextError;
pub use tree::{TextTree, TreeError};
pub use types::{
    resolve_type_name, ArrayDescriptor, FieldDescriptor, PrimitiveKind, RegistryError,
    SequenceDescriptor, TypeDescriptor, TypeDescriptorBuilder, TypeKind, TypeRegistry,
};
pub use value::{Record, RecordValue, ValueError};
