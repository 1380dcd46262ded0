// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conversion between record values and JSON text trees.
//!
//! [`flatten`] is total: every valid record has a tree. [`build`] walks
//! the declared fields of a type and never fills in a default; a missing
//! or mis-shaped member is an error naming its dotted path.

use crate::types::{PrimitiveKind, TypeDescriptor, TypeKind};
use crate::value::{
    char_fits_octet, char_fits_wchar, display_path, index_path, join_path, Record, RecordValue,
};
use serde_json::{Map, Number, Value};
use std::sync::Arc;
use thiserror::Error;

/// Nested, field-named intermediate form of a record.
pub type TextTree = Value;

const NAN: &str = "NaN";
const INFINITY: &str = "Infinity";
const NEG_INFINITY: &str = "-Infinity";
/// Prefix of a NaN spelled with its exact bit pattern.
const NAN_BITS: &str = "NaN:0x";

/// Errors raised while building a record from a text tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("missing field '{path}'")]
    MissingField { path: String },

    #[error("field '{path}': expected {expected}, found {found}")]
    FieldKindMismatch {
        path: String,
        expected: String,
        found: &'static str,
    },

    #[error("unknown field '{path}'")]
    UnknownField { path: String },

    #[error("field '{path}': {value} is out of range for {expected}")]
    OutOfRange {
        path: String,
        expected: &'static str,
        value: String,
    },

    #[error("field '{path}': length {length} exceeds bound {max}")]
    BoundExceeded {
        path: String,
        length: usize,
        max: usize,
    },

    #[error("field '{path}': expected {expected} elements, found {found}")]
    ArrayLengthMismatch {
        path: String,
        expected: usize,
        found: usize,
    },
}

/// Flatten a record value into a text tree.
///
/// Struct members keep declaration order. `float` values are widened to
/// `double` so their text form reads back to the same bits; non-finite
/// values become the strings `"NaN"`, `"Infinity"` and `"-Infinity"`.
/// A NaN other than the canonical quiet NaN of its width is written with
/// its bits, `"NaN:0xfff8000000000000"` for a `double` and
/// `"NaN:0x7fc00001"` for a `float`.
pub fn flatten(value: &RecordValue) -> TextTree {
    match value {
        RecordValue::Bool(b) => Value::Bool(*b),
        RecordValue::Octet(n) => Value::from(*n),
        RecordValue::I8(n) => Value::from(*n),
        RecordValue::I16(n) => Value::from(*n),
        RecordValue::U16(n) => Value::from(*n),
        RecordValue::I32(n) => Value::from(*n),
        RecordValue::U32(n) => Value::from(*n),
        RecordValue::I64(n) => Value::from(*n),
        RecordValue::U64(n) => Value::from(*n),
        RecordValue::F32(n) if n.is_nan() && n.to_bits() != f32::NAN.to_bits() => {
            Value::String(format!("{}{:08x}", NAN_BITS, n.to_bits()))
        }
        RecordValue::F64(n) if n.is_nan() && n.to_bits() != f64::NAN.to_bits() => {
            Value::String(format!("{}{:016x}", NAN_BITS, n.to_bits()))
        }
        RecordValue::F32(n) => float_to_json(f64::from(*n)),
        RecordValue::F64(n) => float_to_json(*n),
        RecordValue::Char(c) | RecordValue::WChar(c) => Value::String(c.to_string()),
        RecordValue::String(s) | RecordValue::WString(s) => Value::String(s.clone()),
        RecordValue::Struct(fields) => {
            let mut obj = Map::with_capacity(fields.len());
            for (name, val) in fields {
                obj.insert(name.clone(), flatten(val));
            }
            Value::Object(obj)
        }
        RecordValue::Sequence(items) | RecordValue::Array(items) => {
            Value::Array(items.iter().map(flatten).collect())
        }
    }
}

fn float_to_json(v: f64) -> Value {
    match Number::from_f64(v) {
        Some(n) => Value::Number(n),
        None if v.is_nan() => Value::String(NAN.into()),
        None if v.is_sign_positive() => Value::String(INFINITY.into()),
        None => Value::String(NEG_INFINITY.into()),
    }
}

/// Build a record of type `descriptor` from a text tree.
pub fn build(tree: &TextTree, descriptor: &Arc<TypeDescriptor>) -> Result<Record, TreeError> {
    let value = build_value(tree, descriptor, "")?;
    Ok(Record::from_checked(descriptor, value))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "floating-point number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(path: &str, desc: &TypeDescriptor, found: &Value) -> TreeError {
    TreeError::FieldKindMismatch {
        path: display_path(path),
        expected: desc.describe(),
        found: json_kind(found),
    }
}

fn build_value(tree: &Value, desc: &TypeDescriptor, path: &str) -> Result<RecordValue, TreeError> {
    match &desc.kind {
        TypeKind::Nested(inner) => build_value(tree, inner, path),
        TypeKind::Primitive(kind) => build_primitive(tree, *kind, desc, path),
        TypeKind::Struct(fields) => {
            let Value::Object(obj) = tree else {
                return Err(mismatch(path, desc, tree));
            };
            let mut members = Vec::with_capacity(fields.len());
            for field in fields {
                let field_path = join_path(path, &field.name);
                let member = obj
                    .get(&field.name)
                    .ok_or_else(|| TreeError::MissingField {
                        path: field_path.clone(),
                    })?;
                members.push((
                    field.name.clone(),
                    build_value(member, &field.type_desc, &field_path)?,
                ));
            }
            if let Some(extra) = obj.keys().find(|key| desc.field(key).is_none()) {
                return Err(TreeError::UnknownField {
                    path: join_path(path, extra),
                });
            }
            Ok(RecordValue::Struct(members))
        }
        TypeKind::Sequence(seq) => {
            let Value::Array(items) = tree else {
                return Err(mismatch(path, desc, tree));
            };
            if let Some(max) = seq.max_length {
                if items.len() > max {
                    return Err(TreeError::BoundExceeded {
                        path: display_path(path),
                        length: items.len(),
                        max,
                    });
                }
            }
            let values = items
                .iter()
                .enumerate()
                .map(|(i, item)| build_value(item, &seq.element_type, &index_path(path, i)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(RecordValue::Sequence(values))
        }
        TypeKind::Array(arr) => {
            let Value::Array(items) = tree else {
                return Err(mismatch(path, desc, tree));
            };
            if items.len() != arr.length {
                return Err(TreeError::ArrayLengthMismatch {
                    path: display_path(path),
                    expected: arr.length,
                    found: items.len(),
                });
            }
            let values = items
                .iter()
                .enumerate()
                .map(|(i, item)| build_value(item, &arr.element_type, &index_path(path, i)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(RecordValue::Array(values))
        }
    }
}

fn build_primitive(
    tree: &Value,
    kind: PrimitiveKind,
    desc: &TypeDescriptor,
    path: &str,
) -> Result<RecordValue, TreeError> {
    let out_of_range = |value: &dyn std::fmt::Display| TreeError::OutOfRange {
        path: display_path(path),
        expected: kind.idl_name(),
        value: value.to_string(),
    };

    // Integers must be JSON integers; `1.0` is not accepted for a `long`.
    macro_rules! integer {
        ($ty:ty, $variant:ident) => {{
            let n = match tree {
                Value::Number(n) if !n.is_f64() => n,
                _ => return Err(mismatch(path, desc, tree)),
            };
            let converted = match (n.as_i64(), n.as_u64()) {
                (Some(v), _) => <$ty>::try_from(v).ok(),
                (None, Some(v)) => <$ty>::try_from(v).ok(),
                (None, None) => None,
            };
            converted
                .map(RecordValue::$variant)
                .ok_or_else(|| out_of_range(n))
        }};
    }

    match kind {
        PrimitiveKind::Bool => match tree {
            Value::Bool(b) => Ok(RecordValue::Bool(*b)),
            _ => Err(mismatch(path, desc, tree)),
        },
        PrimitiveKind::Octet => integer!(u8, Octet),
        PrimitiveKind::I8 => integer!(i8, I8),
        PrimitiveKind::I16 => integer!(i16, I16),
        PrimitiveKind::U16 => integer!(u16, U16),
        PrimitiveKind::I32 => integer!(i32, I32),
        PrimitiveKind::U32 => integer!(u32, U32),
        PrimitiveKind::I64 => integer!(i64, I64),
        PrimitiveKind::U64 => integer!(u64, U64),
        PrimitiveKind::F64 => {
            if let Some(nan) = nan_bits(tree, 16)
                .map(f64::from_bits)
                .filter(|v| v.is_nan())
            {
                return Ok(RecordValue::F64(nan));
            }
            json_to_float(tree)
                .map(RecordValue::F64)
                .ok_or_else(|| mismatch(path, desc, tree))
        }
        PrimitiveKind::F32 => {
            if let Some(nan) = nan_bits(tree, 8)
                .and_then(|bits| u32::try_from(bits).ok())
                .map(f32::from_bits)
                .filter(|v| v.is_nan())
            {
                return Ok(RecordValue::F32(nan));
            }
            let v = json_to_float(tree).ok_or_else(|| mismatch(path, desc, tree))?;
            let narrowed = if v.is_nan() { f32::NAN } else { v as f32 };
            if v.is_finite() && !narrowed.is_finite() {
                return Err(out_of_range(&v));
            }
            Ok(RecordValue::F32(narrowed))
        }
        PrimitiveKind::Char | PrimitiveKind::WChar => {
            let Value::String(s) = tree else {
                return Err(mismatch(path, desc, tree));
            };
            let mut chars = s.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(out_of_range(&format!("{:?}", s)));
            };
            let fits = if kind == PrimitiveKind::Char {
                char_fits_octet(c)
            } else {
                char_fits_wchar(c)
            };
            match (fits, kind) {
                (false, _) => Err(out_of_range(&format!("{:?}", c))),
                (true, PrimitiveKind::Char) => Ok(RecordValue::Char(c)),
                (true, _) => Ok(RecordValue::WChar(c)),
            }
        }
        PrimitiveKind::String { max_length } | PrimitiveKind::WString { max_length } => {
            let Value::String(s) = tree else {
                return Err(mismatch(path, desc, tree));
            };
            let wide = matches!(kind, PrimitiveKind::WString { .. });
            let length = if wide {
                s.encode_utf16().count()
            } else {
                s.len()
            };
            if let Some(max) = max_length {
                if length > max {
                    return Err(TreeError::BoundExceeded {
                        path: display_path(path),
                        length,
                        max,
                    });
                }
            }
            Ok(if wide {
                RecordValue::WString(s.clone())
            } else {
                RecordValue::String(s.clone())
            })
        }
    }
}

/// Bits of a `"NaN:0x..."` string holding exactly `digits` hex digits.
fn nan_bits(tree: &Value, digits: usize) -> Option<u64> {
    let hex = tree.as_str()?.strip_prefix(NAN_BITS)?;
    if hex.len() != digits || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(hex, 16).ok()
}

fn json_to_float(tree: &Value) -> Option<f64> {
    match tree {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => match s.as_str() {
            NAN => Some(f64::NAN),
            INFINITY => Some(f64::INFINITY),
            NEG_INFINITY => Some(f64::NEG_INFINITY),
            _ => None,
        },
        _ => None,
    }
}
