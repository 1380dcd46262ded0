// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! CDR encoding/decoding for RTC records.
//!
//! Plain CDR body, no encapsulation header. Fields are written in
//! declaration order and every primitive is aligned to its own size,
//! measured from the start of the buffer. The byte order is always an
//! explicit argument.

use crate::types::{PrimitiveKind, TypeDescriptor, TypeKind};
use crate::value::{char_fits_octet, char_fits_wchar, Record, RecordValue};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Byte order of a CDR stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Lowercase name, as used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Little => "little",
            Self::Big => "big",
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a byte order name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid byte order '{0}' (expected 'little' or 'big')")]
pub struct ParseByteOrderError(pub String);

impl FromStr for ByteOrder {
    type Err = ParseByteOrderError;

    /// Parse a data port endian property. Lists such as `"little,big"`
    /// are accepted; the first entry wins.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let first = s.split(',').next().unwrap_or_default().trim();
        match first.to_ascii_lowercase().as_str() {
            "little" | "le" => Ok(Self::Little),
            "big" | "be" => Ok(Self::Big),
            _ => Err(ParseByteOrderError(s.to_string())),
        }
    }
}

/// Errors for CDR operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CdrError {
    #[error("truncated buffer at offset {offset}: need {need} bytes, have {have}")]
    TruncatedBuffer {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("sequence declares {declared} elements but only {remaining} bytes remain")]
    MalformedSequenceLength { declared: usize, remaining: usize },

    #[error("length {length} exceeds bound {max}")]
    BoundExceeded { length: usize, max: usize },

    #[error("invalid string: {0}")]
    InvalidString(String),

    #[error("invalid character U+{0:04X}")]
    InvalidChar(u32),

    #[error("invalid boolean byte {0:#04x}")]
    InvalidBoolean(u8),

    #[error("array length mismatch: expected {expected}, found {found}")]
    ArrayLengthMismatch { expected: usize, found: usize },

    #[error("value mismatch: expected {expected}, found {found}")]
    KindMismatch { expected: String, found: String },

    #[error("length {0} does not fit in a CDR length prefix")]
    LengthOverflow(usize),

    #[error("{count} trailing bytes after record")]
    TrailingBytes { count: usize },
}

/// Largest primitive alignment. Trailing zero bytes shorter than this
/// are tolerated as end-of-message padding.
const MAX_ALIGNMENT: usize = 8;

/// Encode a record to CDR bytes.
pub fn encode(record: &Record, order: ByteOrder) -> Result<Vec<u8>, CdrError> {
    let mut encoder = CdrEncoder::new(order);
    encoder.encode_value(record.value(), &record.descriptor().kind)?;
    Ok(encoder.into_bytes())
}

/// Decode CDR bytes to a record of the given type.
pub fn decode(
    bytes: &[u8],
    descriptor: &Arc<TypeDescriptor>,
    order: ByteOrder,
) -> Result<Record, CdrError> {
    let mut decoder = CdrDecoder::new(bytes, order);
    let value = decoder.decode_value(&descriptor.kind)?;
    decoder.finish()?;
    Ok(Record::from_checked(descriptor, value))
}

/// Fewest bytes any encoding of the type can occupy, ignoring padding.
fn packed_size(kind: &TypeKind) -> usize {
    match kind {
        TypeKind::Primitive(p) => p.size().unwrap_or(4),
        TypeKind::Struct(fields) => fields
            .iter()
            .map(|f| packed_size(&f.type_desc.kind))
            .sum(),
        TypeKind::Sequence(_) => 4,
        TypeKind::Array(arr) => packed_size(&arr.element_type.kind).saturating_mul(arr.length),
        TypeKind::Nested(inner) => packed_size(&inner.kind),
    }
}

macro_rules! write_num {
    ($self:ident, $v:expr) => {{
        let v = $v;
        $self.align(std::mem::size_of_val(&v));
        match $self.order {
            ByteOrder::Little => $self.buffer.extend_from_slice(&v.to_le_bytes()),
            ByteOrder::Big => $self.buffer.extend_from_slice(&v.to_be_bytes()),
        }
    }};
}

macro_rules! read_num {
    ($self:ident, $ty:ty) => {{
        const SIZE: usize = std::mem::size_of::<$ty>();
        $self.align(SIZE);
        let bytes = $self.read_bytes(SIZE)?;
        let mut raw = [0u8; SIZE];
        raw.copy_from_slice(bytes);
        match $self.order {
            ByteOrder::Little => <$ty>::from_le_bytes(raw),
            ByteOrder::Big => <$ty>::from_be_bytes(raw),
        }
    }};
}

/// CDR encoder.
struct CdrEncoder {
    buffer: Vec<u8>,
    order: ByteOrder,
}

impl CdrEncoder {
    fn new(order: ByteOrder) -> Self {
        Self {
            buffer: Vec::new(),
            order,
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    fn align(&mut self, alignment: usize) {
        let padding = (alignment - (self.buffer.len() % alignment)) % alignment;
        self.buffer.extend(std::iter::repeat_n(0, padding));
    }

    fn write_length(&mut self, len: usize) -> Result<(), CdrError> {
        let len = u32::try_from(len).map_err(|_| CdrError::LengthOverflow(len))?;
        write_num!(self, len);
        Ok(())
    }

    fn encode_value(&mut self, value: &RecordValue, kind: &TypeKind) -> Result<(), CdrError> {
        match (kind, value) {
            (TypeKind::Primitive(p), _) => self.encode_primitive(value, *p),
            (TypeKind::Struct(fields), RecordValue::Struct(members)) => {
                for (field, (_, member)) in fields.iter().zip(members) {
                    self.encode_value(member, &field.type_desc.kind)?;
                }
                Ok(())
            }
            (TypeKind::Sequence(seq), RecordValue::Sequence(items)) => {
                if let Some(max) = seq.max_length {
                    if items.len() > max {
                        return Err(CdrError::BoundExceeded {
                            length: items.len(),
                            max,
                        });
                    }
                }
                self.write_length(items.len())?;
                for item in items {
                    self.encode_value(item, &seq.element_type.kind)?;
                }
                Ok(())
            }
            (TypeKind::Array(arr), RecordValue::Array(items)) => {
                if items.len() != arr.length {
                    return Err(CdrError::ArrayLengthMismatch {
                        expected: arr.length,
                        found: items.len(),
                    });
                }
                for item in items {
                    self.encode_value(item, &arr.element_type.kind)?;
                }
                Ok(())
            }
            (TypeKind::Nested(inner), _) => self.encode_value(value, &inner.kind),
            _ => Err(CdrError::KindMismatch {
                expected: format!("{:?}", kind),
                found: value.kind_name().to_string(),
            }),
        }
    }

    fn encode_primitive(
        &mut self,
        value: &RecordValue,
        kind: PrimitiveKind,
    ) -> Result<(), CdrError> {
        match (value, kind) {
            (RecordValue::Bool(v), PrimitiveKind::Bool) => self.buffer.push(u8::from(*v)),
            (RecordValue::Octet(v), PrimitiveKind::Octet) => self.buffer.push(*v),
            (RecordValue::I8(v), PrimitiveKind::I8) => self.buffer.push(*v as u8),
            (RecordValue::Char(c), PrimitiveKind::Char) => {
                if !char_fits_octet(*c) {
                    return Err(CdrError::InvalidChar(*c as u32));
                }
                self.buffer.push(*c as u8);
            }
            (RecordValue::WChar(c), PrimitiveKind::WChar) => {
                if !char_fits_wchar(*c) {
                    return Err(CdrError::InvalidChar(*c as u32));
                }
                write_num!(self, *c as u16);
            }
            (RecordValue::I16(v), PrimitiveKind::I16) => write_num!(self, *v),
            (RecordValue::U16(v), PrimitiveKind::U16) => write_num!(self, *v),
            (RecordValue::I32(v), PrimitiveKind::I32) => write_num!(self, *v),
            (RecordValue::U32(v), PrimitiveKind::U32) => write_num!(self, *v),
            (RecordValue::I64(v), PrimitiveKind::I64) => write_num!(self, *v),
            (RecordValue::U64(v), PrimitiveKind::U64) => write_num!(self, *v),
            (RecordValue::F32(v), PrimitiveKind::F32) => write_num!(self, *v),
            (RecordValue::F64(v), PrimitiveKind::F64) => write_num!(self, *v),
            (RecordValue::String(s), PrimitiveKind::String { max_length }) => {
                if let Some(max) = max_length {
                    if s.len() > max {
                        return Err(CdrError::BoundExceeded {
                            length: s.len(),
                            max,
                        });
                    }
                }
                // Length includes null terminator
                self.write_length(s.len() + 1)?;
                self.buffer.extend_from_slice(s.as_bytes());
                self.buffer.push(0);
            }
            (RecordValue::WString(s), PrimitiveKind::WString { max_length }) => {
                let units: Vec<u16> = s.encode_utf16().collect();
                if let Some(max) = max_length {
                    if units.len() > max {
                        return Err(CdrError::BoundExceeded {
                            length: units.len(),
                            max,
                        });
                    }
                }
                self.write_length(units.len() + 1)?;
                for unit in units {
                    write_num!(self, unit);
                }
                write_num!(self, 0u16);
            }
            _ => {
                return Err(CdrError::KindMismatch {
                    expected: kind.idl_name().to_string(),
                    found: value.kind_name().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// CDR decoder.
struct CdrDecoder<'a> {
    buffer: &'a [u8],
    offset: usize,
    order: ByteOrder,
}

impl<'a> CdrDecoder<'a> {
    fn new(buffer: &'a [u8], order: ByteOrder) -> Self {
        Self {
            buffer,
            offset: 0,
            order,
        }
    }

    fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    fn align(&mut self, alignment: usize) {
        self.offset = (self.offset + alignment - 1) & !(alignment - 1);
    }

    fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], CdrError> {
        let end = self
            .offset
            .checked_add(count)
            .filter(|end| *end <= self.buffer.len())
            .ok_or(CdrError::TruncatedBuffer {
                offset: self.offset,
                need: count,
                have: self.remaining(),
            })?;
        let slice = &self.buffer[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn read_length(&mut self) -> Result<usize, CdrError> {
        Ok(read_num!(self, u32) as usize)
    }

    /// Reject leftover bytes, allowing short zero padding.
    fn finish(&self) -> Result<(), CdrError> {
        let rest = self.buffer.get(self.offset..).unwrap_or_default();
        if rest.len() < MAX_ALIGNMENT && rest.iter().all(|b| *b == 0) {
            Ok(())
        } else {
            Err(CdrError::TrailingBytes { count: rest.len() })
        }
    }

    fn decode_value(&mut self, kind: &TypeKind) -> Result<RecordValue, CdrError> {
        match kind {
            TypeKind::Primitive(p) => self.decode_primitive(*p),
            TypeKind::Struct(fields) => {
                let mut members = Vec::with_capacity(fields.len());
                for field in fields {
                    let value = self.decode_value(&field.type_desc.kind)?;
                    members.push((field.name.clone(), value));
                }
                Ok(RecordValue::Struct(members))
            }
            TypeKind::Sequence(seq) => {
                let declared = self.read_length()?;
                if let Some(max) = seq.max_length {
                    if declared > max {
                        return Err(CdrError::BoundExceeded {
                            length: declared,
                            max,
                        });
                    }
                }
                // Validate before allocating
                let element_size = packed_size(&seq.element_type.kind).max(1);
                let remaining = self.remaining();
                if declared
                    .checked_mul(element_size)
                    .is_none_or(|need| need > remaining)
                {
                    return Err(CdrError::MalformedSequenceLength {
                        declared,
                        remaining,
                    });
                }
                let mut items = Vec::with_capacity(declared);
                for _ in 0..declared {
                    items.push(self.decode_value(&seq.element_type.kind)?);
                }
                Ok(RecordValue::Sequence(items))
            }
            TypeKind::Array(arr) => {
                let mut items = Vec::with_capacity(arr.length);
                for _ in 0..arr.length {
                    items.push(self.decode_value(&arr.element_type.kind)?);
                }
                Ok(RecordValue::Array(items))
            }
            TypeKind::Nested(inner) => self.decode_value(&inner.kind),
        }
    }

    fn decode_primitive(&mut self, kind: PrimitiveKind) -> Result<RecordValue, CdrError> {
        match kind {
            PrimitiveKind::Bool => match self.read_bytes(1)?[0] {
                0 => Ok(RecordValue::Bool(false)),
                1 => Ok(RecordValue::Bool(true)),
                other => Err(CdrError::InvalidBoolean(other)),
            },
            PrimitiveKind::Octet => Ok(RecordValue::Octet(self.read_bytes(1)?[0])),
            PrimitiveKind::I8 => Ok(RecordValue::I8(self.read_bytes(1)?[0] as i8)),
            PrimitiveKind::Char => Ok(RecordValue::Char(char::from(self.read_bytes(1)?[0]))),
            PrimitiveKind::WChar => {
                let unit = read_num!(self, u16);
                char::from_u32(u32::from(unit))
                    .map(RecordValue::WChar)
                    .ok_or(CdrError::InvalidChar(u32::from(unit)))
            }
            PrimitiveKind::I16 => Ok(RecordValue::I16(read_num!(self, i16))),
            PrimitiveKind::U16 => Ok(RecordValue::U16(read_num!(self, u16))),
            PrimitiveKind::I32 => Ok(RecordValue::I32(read_num!(self, i32))),
            PrimitiveKind::U32 => Ok(RecordValue::U32(read_num!(self, u32))),
            PrimitiveKind::I64 => Ok(RecordValue::I64(read_num!(self, i64))),
            PrimitiveKind::U64 => Ok(RecordValue::U64(read_num!(self, u64))),
            PrimitiveKind::F32 => Ok(RecordValue::F32(read_num!(self, f32))),
            PrimitiveKind::F64 => Ok(RecordValue::F64(read_num!(self, f64))),
            PrimitiveKind::String { max_length } => {
                let len = self.read_length()?;
                if let Some(max) = max_length {
                    if len > max + 1 {
                        return Err(CdrError::BoundExceeded {
                            length: len - 1,
                            max,
                        });
                    }
                }
                if len == 0 {
                    return Err(CdrError::InvalidString("zero length".into()));
                }
                let bytes = self.read_bytes(len)?;
                let (terminator, text) = bytes.split_last().ok_or(CdrError::InvalidString(
                    "empty string body".into(),
                ))?;
                if *terminator != 0 {
                    return Err(CdrError::InvalidString("missing null terminator".into()));
                }
                let s = String::from_utf8(text.to_vec())
                    .map_err(|e| CdrError::InvalidString(e.to_string()))?;
                Ok(RecordValue::String(s))
            }
            PrimitiveKind::WString { max_length } => {
                let len = self.read_length()?;
                if let Some(max) = max_length {
                    if len > max + 1 {
                        return Err(CdrError::BoundExceeded {
                            length: len - 1,
                            max,
                        });
                    }
                }
                if len == 0 {
                    return Err(CdrError::InvalidString("zero length".into()));
                }
                if len.saturating_mul(2) > self.remaining() {
                    return Err(CdrError::TruncatedBuffer {
                        offset: self.offset,
                        need: len.saturating_mul(2),
                        have: self.remaining(),
                    });
                }
                let mut units = Vec::with_capacity(len);
                for _ in 0..len {
                    units.push(read_num!(self, u16));
                }
                if units.pop() != Some(0) {
                    return Err(CdrError::InvalidString("missing null terminator".into()));
                }
                let s = String::from_utf16(&units)
                    .map_err(|e| CdrError::InvalidString(e.to_string()))?;
                Ok(RecordValue::WString(s))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TypeDescriptorBuilder, TypeRegistry};

    fn record(desc: TypeDescriptor, value: RecordValue) -> Record {
        Record::from_value(&Arc::new(desc), value).expect("valid record")
    }

    #[test]
    fn test_byte_order_from_str() {
        assert_eq!("little".parse::<ByteOrder>(), Ok(ByteOrder::Little));
        assert_eq!("BIG".parse::<ByteOrder>(), Ok(ByteOrder::Big));
        assert_eq!("little,big".parse::<ByteOrder>(), Ok(ByteOrder::Little));
        assert_eq!(" big , little".parse::<ByteOrder>(), Ok(ByteOrder::Big));
        assert!("middle".parse::<ByteOrder>().is_err());
        assert!("".parse::<ByteOrder>().is_err());
    }

    #[test]
    fn test_primitive_alignment_padding() {
        let rec = record(
            TypeDescriptorBuilder::new("Padded")
                .field("a", PrimitiveKind::Octet)
                .field("b", PrimitiveKind::I32)
                .field("c", PrimitiveKind::I16)
                .field("d", PrimitiveKind::F64)
                .build(),
            RecordValue::Struct(vec![
                ("a".into(), RecordValue::Octet(0xAB)),
                ("b".into(), RecordValue::I32(1)),
                ("c".into(), RecordValue::I16(-1)),
                ("d".into(), RecordValue::F64(1.0)),
            ]),
        );

        let bytes = encode(&rec, ByteOrder::Little).expect("encode");
        assert_eq!(
            bytes,
            vec![
                0xAB, 0, 0, 0, // a + padding
                1, 0, 0, 0, // b
                0xFF, 0xFF, 0, 0, 0, 0, 0, 0, // c + padding
                0, 0, 0, 0, 0, 0, 0xF0, 0x3F, // d
            ]
        );

        let decoded = decode(&bytes, rec.descriptor(), ByteOrder::Little).expect("decode");
        assert_eq!(decoded, rec);
    }

    #[test]
    fn test_big_endian_layout() {
        let rec = record(
            TypeDescriptorBuilder::new("Pair")
                .field("a", PrimitiveKind::U16)
                .field("b", PrimitiveKind::U32)
                .build(),
            RecordValue::Struct(vec![
                ("a".into(), RecordValue::U16(0x0102)),
                ("b".into(), RecordValue::U32(0x03040506)),
            ]),
        );
        let bytes = encode(&rec, ByteOrder::Big).expect("encode");
        assert_eq!(bytes, vec![0x01, 0x02, 0, 0, 0x03, 0x04, 0x05, 0x06]);
    }

    #[test]
    fn test_string_encoding() {
        let rec = record(
            TypeDescriptorBuilder::new("S").string_field("s").build(),
            RecordValue::Struct(vec![("s".into(), "hi".into())]),
        );
        let bytes = encode(&rec, ByteOrder::Little).expect("encode");
        assert_eq!(bytes, vec![3, 0, 0, 0, b'h', b'i', 0]);
        assert_eq!(
            decode(&bytes, rec.descriptor(), ByteOrder::Little).expect("decode"),
            rec
        );
    }

    #[test]
    fn test_wstring_encoding() {
        let rec = record(
            TypeDescriptorBuilder::new("W")
                .field("w", PrimitiveKind::WString { max_length: None })
                .build(),
            RecordValue::Struct(vec![("w".into(), RecordValue::WString("é".into()))]),
        );
        let bytes = encode(&rec, ByteOrder::Big).expect("encode");
        assert_eq!(bytes, vec![0, 0, 0, 2, 0x00, 0xE9, 0, 0]);
        assert_eq!(
            decode(&bytes, rec.descriptor(), ByteOrder::Big).expect("decode"),
            rec
        );
    }

    #[test]
    fn test_zero_length_string_rejected() {
        let narrow = Arc::new(TypeDescriptorBuilder::new("S").string_field("s").build());
        let wide = Arc::new(
            TypeDescriptorBuilder::new("W")
                .field("w", PrimitiveKind::WString { max_length: None })
                .build(),
        );
        for desc in [narrow, wide] {
            assert_eq!(
                decode(&[0, 0, 0, 0], &desc, ByteOrder::Little),
                Err(CdrError::InvalidString("zero length".into())),
                "{}",
                desc.name
            );
        }

        // The empty string carries its terminator
        let rec = record(
            TypeDescriptorBuilder::new("S").string_field("s").build(),
            RecordValue::Struct(vec![("s".into(), "".into())]),
        );
        assert_eq!(
            encode(&rec, ByteOrder::Little).expect("encode"),
            vec![1, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_sequence_encoding() {
        let registry = TypeRegistry::rtc();
        let desc = registry.get("RTC.TimedShortSeq").expect("registered");
        let value = RecordValue::Struct(vec![
            (
                "tm".into(),
                RecordValue::Struct(vec![
                    ("sec".into(), RecordValue::U32(1)),
                    ("nsec".into(), RecordValue::U32(2)),
                ]),
            ),
            (
                "data".into(),
                RecordValue::Sequence(vec![1i16.into(), 2i16.into(), 3i16.into()]),
            ),
        ]);
        let rec = Record::from_value(&desc, value).expect("valid");
        let bytes = encode(&rec, ByteOrder::Little).expect("encode");
        assert_eq!(
            bytes,
            vec![1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 1, 0, 2, 0, 3, 0]
        );
        assert_eq!(decode(&bytes, &desc, ByteOrder::Little).expect("decode"), rec);
    }

    #[test]
    fn test_truncated_buffer() {
        let registry = TypeRegistry::rtc();
        let desc = registry.get("RTC.Point2D").expect("registered");
        let err = decode(&[0u8; 12], &desc, ByteOrder::Little).unwrap_err();
        assert_eq!(
            err,
            CdrError::TruncatedBuffer {
                offset: 8,
                need: 8,
                have: 4
            }
        );
    }

    #[test]
    fn test_malformed_sequence_length() {
        let registry = TypeRegistry::rtc();
        let desc = registry.get("RTC.TimedDoubleSeq").expect("registered");
        // tm, then a sequence claiming a billion doubles
        let mut bytes = vec![0u8; 8];
        bytes.extend_from_slice(&1_000_000_000u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 8]);
        let err = decode(&bytes, &desc, ByteOrder::Little).unwrap_err();
        assert_eq!(
            err,
            CdrError::MalformedSequenceLength {
                declared: 1_000_000_000,
                remaining: 8
            }
        );
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let registry = TypeRegistry::rtc();
        let desc = registry.get("RTC.TimedLong").expect("registered");
        assert!(decode(&[0u8; 12], &desc, ByteOrder::Little).is_ok());
        // short zero padding is tolerated
        assert!(decode(&[0u8; 16], &desc, ByteOrder::Little).is_ok());
        assert_eq!(
            decode(&[0u8; 24], &desc, ByteOrder::Little).unwrap_err(),
            CdrError::TrailingBytes { count: 12 }
        );
        let mut bytes = vec![0u8; 12];
        bytes.push(7);
        assert_eq!(
            decode(&bytes, &desc, ByteOrder::Little).unwrap_err(),
            CdrError::TrailingBytes { count: 1 }
        );
    }

    #[test]
    fn test_invalid_boolean() {
        let registry = TypeRegistry::rtc();
        let desc = registry.get("RTC.TimedBoolean").expect("registered");
        let mut bytes = vec![0u8; 8];
        bytes.push(2);
        assert_eq!(
            decode(&bytes, &desc, ByteOrder::Little).unwrap_err(),
            CdrError::InvalidBoolean(2)
        );
    }

    #[test]
    fn test_char_latin1() {
        let registry = TypeRegistry::rtc();
        let desc = registry.get("RTC.TimedChar").expect("registered");
        let mut bytes = vec![0u8; 8];
        bytes.push(0xE9);
        let rec = decode(&bytes, &desc, ByteOrder::Little).expect("decode");
        assert_eq!(rec.get_field("data"), Some(&RecordValue::Char('é')));
        assert_eq!(encode(&rec, ByteOrder::Little).expect("encode"), bytes);
    }

    #[test]
    fn test_wrong_byte_order_changes_value() {
        let registry = TypeRegistry::rtc();
        let desc = registry.get("RTC.TimedLong").expect("registered");
        let mut value = RecordValue::zero(&desc);
        if let RecordValue::Struct(members) = &mut value {
            members[1].1 = RecordValue::I32(42);
        }
        let rec = Record::from_value(&desc, value).expect("valid");
        let bytes = encode(&rec, ByteOrder::Little).expect("encode");
        let swapped = decode(&bytes, &desc, ByteOrder::Big).expect("same length");
        assert_eq!(swapped.get_field("data"), Some(&RecordValue::I32(42 << 24)));
    }
}
