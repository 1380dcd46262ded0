// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record values and the typed `Record` container.

use crate::types::{PrimitiveKind, TypeDescriptor, TypeKind};
use std::sync::Arc;
use thiserror::Error;

/// A value of any RTC record shape.
///
/// Struct members are stored in declaration order; every traversal
/// (CDR encode, JSON flatten) visits them in that order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    // Primitives
    Bool(bool),
    Octet(u8),
    Char(char),
    WChar(char),
    I8(i8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    WString(String),

    // Composites
    Struct(Vec<(String, RecordValue)>),
    Sequence(Vec<RecordValue>),
    Array(Vec<RecordValue>),
}

impl RecordValue {
    /// Zero-initialized value for a type: numbers 0, strings empty,
    /// sequences empty, arrays filled with zeroed elements.
    pub fn zero(desc: &TypeDescriptor) -> Self {
        match &desc.kind {
            TypeKind::Primitive(p) => Self::zero_primitive(*p),
            TypeKind::Struct(fields) => Self::Struct(
                fields
                    .iter()
                    .map(|f| (f.name.clone(), Self::zero(&f.type_desc)))
                    .collect(),
            ),
            TypeKind::Sequence(_) => Self::Sequence(Vec::new()),
            TypeKind::Array(arr) => {
                Self::Array(vec![Self::zero(&arr.element_type); arr.length])
            }
            TypeKind::Nested(inner) => Self::zero(inner),
        }
    }

    fn zero_primitive(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Bool => Self::Bool(false),
            PrimitiveKind::Octet => Self::Octet(0),
            PrimitiveKind::Char => Self::Char('\0'),
            PrimitiveKind::WChar => Self::WChar('\0'),
            PrimitiveKind::I8 => Self::I8(0),
            PrimitiveKind::I16 => Self::I16(0),
            PrimitiveKind::U16 => Self::U16(0),
            PrimitiveKind::I32 => Self::I32(0),
            PrimitiveKind::U32 => Self::U32(0),
            PrimitiveKind::I64 => Self::I64(0),
            PrimitiveKind::U64 => Self::U64(0),
            PrimitiveKind::F32 => Self::F32(0.0),
            PrimitiveKind::F64 => Self::F64(0.0),
            PrimitiveKind::String { .. } => Self::String(String::new()),
            PrimitiveKind::WString { .. } => Self::WString(String::new()),
        }
    }

    /// Short kind name, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Octet(_) => "octet",
            Self::Char(_) => "char",
            Self::WChar(_) => "wchar",
            Self::I8(_) => "int8",
            Self::I16(_) => "short",
            Self::U16(_) => "unsigned short",
            Self::I32(_) => "long",
            Self::U32(_) => "unsigned long",
            Self::I64(_) => "long long",
            Self::U64(_) => "unsigned long long",
            Self::F32(_) => "float",
            Self::F64(_) => "double",
            Self::String(_) => "string",
            Self::WString(_) => "wstring",
            Self::Struct(_) => "struct",
            Self::Sequence(_) => "sequence",
            Self::Array(_) => "array",
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i16.
    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Self::I16(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i32.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u32.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::U32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f32.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::F32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) | Self::WString(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as sequence or array elements.
    pub fn as_sequence(&self) -> Option<&[RecordValue]> {
        match self {
            Self::Sequence(v) | Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get struct field.
    pub fn get_field(&self, name: &str) -> Option<&RecordValue> {
        match self {
            Self::Struct(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Follow a dotted path (`data.position.x`).
    pub fn get_path(&self, path: &str) -> Option<&RecordValue> {
        path.split('.')
            .try_fold(self, |value, segment| value.get_field(segment))
    }
}

// Conversion traits
macro_rules! impl_from_primitive {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for RecordValue {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        }
    };
}

impl_from_primitive!(bool, Bool);
impl_from_primitive!(u8, Octet);
impl_from_primitive!(i8, I8);
impl_from_primitive!(i16, I16);
impl_from_primitive!(u16, U16);
impl_from_primitive!(i32, I32);
impl_from_primitive!(u32, U32);
impl_from_primitive!(i64, I64);
impl_from_primitive!(u64, U64);
impl_from_primitive!(f32, F32);
impl_from_primitive!(f64, F64);
impl_from_primitive!(String, String);

impl From<&str> for RecordValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

/// Errors raised when a value does not match its descriptor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("missing field '{0}'")]
    MissingField(String),

    #[error("unexpected field '{0}'")]
    UnexpectedField(String),

    #[error("'{path}': expected {expected}, found {found}")]
    KindMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("'{path}': expected {expected} elements, found {found}")]
    LengthMismatch {
        path: String,
        expected: usize,
        found: usize,
    },

    #[error("'{path}': length {length} exceeds bound {max}")]
    BoundExceeded {
        path: String,
        length: usize,
        max: usize,
    },

    #[error("'{path}': {value:?} does not fit in a {kind}")]
    InvalidChar {
        path: String,
        value: char,
        kind: &'static str,
    },
}

/// Join a parent path and a member name with a dot.
pub(crate) fn join_path(parent: &str, member: &str) -> String {
    if parent.is_empty() {
        member.to_string()
    } else {
        format!("{}.{}", parent, member)
    }
}

/// Append an element index to a path.
pub(crate) fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

/// Display form of a path, `<root>` for the top level.
pub(crate) fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

/// Check that a narrow char fits in one CDR octet.
pub(crate) fn char_fits_octet(c: char) -> bool {
    (c as u32) <= 0xFF
}

/// Check that a wide char fits in one UTF-16 code unit.
pub(crate) fn char_fits_wchar(c: char) -> bool {
    (c as u32) <= 0xFFFF
}

/// Verify that `value` has exactly the shape described by `desc`.
pub fn check_shape(value: &RecordValue, desc: &TypeDescriptor) -> Result<(), ValueError> {
    check_at(value, desc, "")
}

fn mismatch(path: &str, desc: &TypeDescriptor, value: &RecordValue) -> ValueError {
    ValueError::KindMismatch {
        path: display_path(path),
        expected: desc.describe(),
        found: value.kind_name().to_string(),
    }
}

fn check_at(value: &RecordValue, desc: &TypeDescriptor, path: &str) -> Result<(), ValueError> {
    match (&desc.kind, value) {
        (TypeKind::Nested(inner), _) => check_at(value, inner, path),
        (TypeKind::Primitive(kind), _) => check_primitive(value, *kind, desc, path),
        (TypeKind::Struct(fields), RecordValue::Struct(members)) => {
            for (declared, (name, member)) in fields.iter().zip(members.iter()) {
                let member_path = join_path(path, &declared.name);
                if *name != declared.name {
                    return Err(if desc.field(name).is_some() {
                        ValueError::MissingField(member_path)
                    } else {
                        ValueError::UnexpectedField(join_path(path, name))
                    });
                }
                check_at(member, &declared.type_desc, &member_path)?;
            }
            if let Some(declared) = fields.get(members.len()) {
                return Err(ValueError::MissingField(join_path(path, &declared.name)));
            }
            if let Some((name, _)) = members.get(fields.len()) {
                return Err(ValueError::UnexpectedField(join_path(path, name)));
            }
            Ok(())
        }
        (TypeKind::Sequence(seq), RecordValue::Sequence(items)) => {
            if let Some(max) = seq.max_length {
                if items.len() > max {
                    return Err(ValueError::BoundExceeded {
                        path: display_path(path),
                        length: items.len(),
                        max,
                    });
                }
            }
            for (i, item) in items.iter().enumerate() {
                check_at(item, &seq.element_type, &index_path(path, i))?;
            }
            Ok(())
        }
        (TypeKind::Array(arr), RecordValue::Array(items)) => {
            if items.len() != arr.length {
                return Err(ValueError::LengthMismatch {
                    path: display_path(path),
                    expected: arr.length,
                    found: items.len(),
                });
            }
            for (i, item) in items.iter().enumerate() {
                check_at(item, &arr.element_type, &index_path(path, i))?;
            }
            Ok(())
        }
        _ => Err(mismatch(path, desc, value)),
    }
}

fn check_primitive(
    value: &RecordValue,
    kind: PrimitiveKind,
    desc: &TypeDescriptor,
    path: &str,
) -> Result<(), ValueError> {
    let bound_check = |length: usize, max_length: Option<usize>| match max_length {
        Some(max) if length > max => Err(ValueError::BoundExceeded {
            path: display_path(path),
            length,
            max,
        }),
        _ => Ok(()),
    };

    match (kind, value) {
        (PrimitiveKind::Bool, RecordValue::Bool(_))
        | (PrimitiveKind::Octet, RecordValue::Octet(_))
        | (PrimitiveKind::I8, RecordValue::I8(_))
        | (PrimitiveKind::I16, RecordValue::I16(_))
        | (PrimitiveKind::U16, RecordValue::U16(_))
        | (PrimitiveKind::I32, RecordValue::I32(_))
        | (PrimitiveKind::U32, RecordValue::U32(_))
        | (PrimitiveKind::I64, RecordValue::I64(_))
        | (PrimitiveKind::U64, RecordValue::U64(_))
        | (PrimitiveKind::F32, RecordValue::F32(_))
        | (PrimitiveKind::F64, RecordValue::F64(_)) => Ok(()),
        (PrimitiveKind::Char, RecordValue::Char(c)) => {
            if char_fits_octet(*c) {
                Ok(())
            } else {
                Err(ValueError::InvalidChar {
                    path: display_path(path),
                    value: *c,
                    kind: "char",
                })
            }
        }
        (PrimitiveKind::WChar, RecordValue::WChar(c)) => {
            if char_fits_wchar(*c) {
                Ok(())
            } else {
                Err(ValueError::InvalidChar {
                    path: display_path(path),
                    value: *c,
                    kind: "wchar",
                })
            }
        }
        (PrimitiveKind::String { max_length }, RecordValue::String(s)) => {
            bound_check(s.len(), max_length)
        }
        (PrimitiveKind::WString { max_length }, RecordValue::WString(s)) => {
            bound_check(s.encode_utf16().count(), max_length)
        }
        _ => Err(mismatch(path, desc, value)),
    }
}

/// A record value paired with its type descriptor.
///
/// The value always matches the descriptor exactly; every constructor
/// either builds the value from the descriptor or checks it.
#[derive(Debug, Clone)]
pub struct Record {
    descriptor: Arc<TypeDescriptor>,
    value: RecordValue,
}

impl Record {
    /// Create a zero-initialized record.
    pub fn zero(descriptor: &Arc<TypeDescriptor>) -> Self {
        Self {
            descriptor: descriptor.clone(),
            value: RecordValue::zero(descriptor),
        }
    }

    /// Create from an existing value, checking it against the descriptor.
    pub fn from_value(
        descriptor: &Arc<TypeDescriptor>,
        value: RecordValue,
    ) -> Result<Self, ValueError> {
        check_shape(&value, descriptor)?;
        Ok(Self::from_checked(descriptor, value))
    }

    /// Wrap a value already produced by a descriptor-driven walk.
    pub(crate) fn from_checked(descriptor: &Arc<TypeDescriptor>, value: RecordValue) -> Self {
        Self {
            descriptor: descriptor.clone(),
            value,
        }
    }

    /// Get the type descriptor.
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// Get the qualified type name.
    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    /// Get the underlying value.
    pub fn value(&self) -> &RecordValue {
        &self.value
    }

    /// Into inner value.
    pub fn into_value(self) -> RecordValue {
        self.value
    }

    /// Get a top-level field.
    pub fn get_field(&self, name: &str) -> Option<&RecordValue> {
        self.value.get_field(name)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.name == other.descriptor.name && self.value == other.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeDescriptorBuilder;

    fn point2d() -> Arc<TypeDescriptor> {
        Arc::new(
            TypeDescriptorBuilder::new("RTC.Point2D")
                .fields(&["x", "y"], PrimitiveKind::F64)
                .build(),
        )
    }

    #[test]
    fn test_zero_value_follows_declaration_order() {
        let desc = Arc::new(
            TypeDescriptorBuilder::new("Mixed")
                .field("b", PrimitiveKind::Bool)
                .string_field("name")
                .sequence_field("seq", PrimitiveKind::I16)
                .array_field("arr", PrimitiveKind::Octet, 3)
                .build(),
        );

        let zero = RecordValue::zero(&desc);
        let RecordValue::Struct(fields) = &zero else {
            panic!("Expected struct");
        };
        let names: Vec<_> = fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["b", "name", "seq", "arr"]);
        assert_eq!(zero.get_field("b"), Some(&RecordValue::Bool(false)));
        assert_eq!(zero.get_field("name").and_then(|v| v.as_str()), Some(""));
        assert_eq!(zero.get_field("seq"), Some(&RecordValue::Sequence(vec![])));
        assert_eq!(
            zero.get_field("arr"),
            Some(&RecordValue::Array(vec![RecordValue::Octet(0); 3]))
        );
    }

    #[test]
    fn test_from_value_accepts_exact_shape() {
        let desc = point2d();
        let value = RecordValue::Struct(vec![
            ("x".into(), 1.5f64.into()),
            ("y".into(), (-2.25f64).into()),
        ]);
        let record = Record::from_value(&desc, value).expect("valid");
        assert_eq!(record.get_field("y").and_then(|v| v.as_f64()), Some(-2.25));
    }

    #[test]
    fn test_from_value_rejects_missing_field() {
        let desc = point2d();
        let value = RecordValue::Struct(vec![("x".into(), 1.0f64.into())]);
        assert_eq!(
            Record::from_value(&desc, value),
            Err(ValueError::MissingField("y".into()))
        );
    }

    #[test]
    fn test_from_value_rejects_extra_field() {
        let desc = point2d();
        let value = RecordValue::Struct(vec![
            ("x".into(), 1.0f64.into()),
            ("y".into(), 2.0f64.into()),
            ("z".into(), 3.0f64.into()),
        ]);
        assert_eq!(
            Record::from_value(&desc, value),
            Err(ValueError::UnexpectedField("z".into()))
        );
    }

    #[test]
    fn test_from_value_rejects_wrong_kind() {
        let desc = point2d();
        let value = RecordValue::Struct(vec![
            ("x".into(), 1.0f32.into()),
            ("y".into(), 2.0f64.into()),
        ]);
        let err = Record::from_value(&desc, value).unwrap_err();
        assert!(matches!(err, ValueError::KindMismatch { ref path, .. } if path == "x"));
    }

    #[test]
    fn test_char_out_of_octet_range() {
        let desc = Arc::new(
            TypeDescriptorBuilder::new("C")
                .field("c", PrimitiveKind::Char)
                .build(),
        );
        let value = RecordValue::Struct(vec![("c".into(), RecordValue::Char('世'))]);
        assert!(matches!(
            Record::from_value(&desc, value),
            Err(ValueError::InvalidChar { kind: "char", .. })
        ));
    }

    #[test]
    fn test_get_path() {
        let value = RecordValue::Struct(vec![(
            "data".into(),
            RecordValue::Struct(vec![("heading".into(), 0.5f64.into())]),
        )]);
        assert_eq!(
            value.get_path("data.heading").and_then(|v| v.as_f64()),
            Some(0.5)
        );
        assert!(value.get_path("data.missing").is_none());
    }
}
