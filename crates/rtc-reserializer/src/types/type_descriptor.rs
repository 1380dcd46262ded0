// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime schema of RTC record shapes.
//!
//! Descriptors are immutable and shared through `Arc`; a named record used
//! as a member (`Pose2D.position`) is referenced, not copied.

use std::sync::Arc;

/// Leaf value kinds of the CDR data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Octet,
    Char,
    WChar,
    I8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    /// Narrow string, optionally bounded in bytes.
    String { max_length: Option<usize> },
    /// Wide string, optionally bounded in UTF-16 units.
    WString { max_length: Option<usize> },
}

impl PrimitiveKind {
    /// Encoded width, or `None` for length-prefixed strings.
    pub fn size(&self) -> Option<usize> {
        let width = match self {
            Self::Bool | Self::Octet | Self::Char | Self::I8 => 1,
            Self::WChar | Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
            Self::String { .. } | Self::WString { .. } => return None,
        };
        Some(width)
    }

    /// Primitives align to their own width; strings to their `u32` prefix.
    pub fn alignment(&self) -> usize {
        self.size().unwrap_or(4)
    }

    /// IDL spelling, used in error messages.
    pub fn idl_name(&self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Octet => "octet",
            Self::Char => "char",
            Self::WChar => "wchar",
            Self::I8 => "int8",
            Self::I16 => "short",
            Self::U16 => "unsigned short",
            Self::I32 => "long",
            Self::U32 => "unsigned long",
            Self::I64 => "long long",
            Self::U64 => "unsigned long long",
            Self::F32 => "float",
            Self::F64 => "double",
            Self::String { .. } => "string",
            Self::WString { .. } => "wstring",
        }
    }
}

/// Shape of a descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Primitive(PrimitiveKind),
    /// Members in declaration order; this order is the wire and text order.
    Struct(Vec<FieldDescriptor>),
    /// `u32` count followed by the elements.
    Sequence(SequenceDescriptor),
    /// Elements only, count fixed by the type.
    Array(ArrayDescriptor),
    /// Reference to a named descriptor.
    Nested(Arc<TypeDescriptor>),
}

/// Named record shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Qualified name (`RTC.Pose2D`), empty for anonymous member types.
    pub name: String,
    pub kind: TypeKind,
}

fn align_up(offset: usize, alignment: usize) -> usize {
    offset.div_ceil(alignment) * alignment
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Unnamed descriptor, used for member types.
    pub fn anonymous(kind: TypeKind) -> Arc<Self> {
        Arc::new(Self::new(String::new(), kind))
    }

    /// Follow `Nested` references down to the concrete kind.
    pub fn resolved_kind(&self) -> &TypeKind {
        match &self.kind {
            TypeKind::Nested(inner) => inner.resolved_kind(),
            kind => kind,
        }
    }

    /// Struct members, or `None` for non-struct shapes.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        if let TypeKind::Struct(fields) = self.resolved_kind() {
            Some(fields)
        } else {
            None
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields()?.iter().position(|f| f.name == name)
    }

    /// True for the `{ tm, data }` timestamp wrapper shape.
    pub fn is_timed(&self) -> bool {
        match self.fields() {
            Some([tm, data]) => tm.name == "tm" && data.name == "data",
            _ => false,
        }
    }

    /// Strictest alignment of any primitive inside the shape.
    pub fn alignment(&self) -> usize {
        match &self.kind {
            TypeKind::Primitive(p) => p.alignment(),
            TypeKind::Struct(fields) => fields
                .iter()
                .map(|f| f.type_desc.alignment())
                .fold(1, usize::max),
            TypeKind::Sequence(_) => 4,
            TypeKind::Array(arr) => arr.element_type.alignment(),
            TypeKind::Nested(inner) => inner.alignment(),
        }
    }

    /// Smallest encoding, including inner padding, when placed at offset 0.
    /// Strings and sequences count their length prefix only.
    pub fn min_size(&self) -> usize {
        match &self.kind {
            TypeKind::Primitive(p) => p.size().unwrap_or(4),
            TypeKind::Struct(fields) => fields.iter().fold(0, |offset, f| {
                align_up(offset, f.type_desc.alignment()) + f.type_desc.min_size()
            }),
            TypeKind::Sequence(_) => 4,
            TypeKind::Array(arr) => arr.element_type.min_size() * arr.length,
            TypeKind::Nested(inner) => inner.min_size(),
        }
    }

    /// Short human-readable kind, used in error messages.
    pub fn describe(&self) -> String {
        match &self.kind {
            TypeKind::Nested(inner) => inner.describe(),
            TypeKind::Primitive(p) => p.idl_name().to_string(),
            TypeKind::Struct(_) if self.name.is_empty() => "struct".to_string(),
            TypeKind::Struct(_) => format!("struct {}", self.name),
            TypeKind::Sequence(seq) => format!("sequence<{}>", seq.element_type.describe()),
            TypeKind::Array(arr) => format!("{}[{}]", arr.element_type.describe(), arr.length),
        }
    }
}

/// Struct member.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub type_desc: Arc<TypeDescriptor>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_desc,
        }
    }
}

/// Variable-length sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDescriptor {
    pub element_type: Arc<TypeDescriptor>,
    /// Element bound; `None` when unbounded.
    pub max_length: Option<usize>,
}

impl SequenceDescriptor {
    pub fn new(element_type: Arc<TypeDescriptor>, max_length: Option<usize>) -> Self {
        Self {
            element_type,
            max_length,
        }
    }
}

/// Fixed-length array.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDescriptor {
    pub element_type: Arc<TypeDescriptor>,
    pub length: usize,
}

impl ArrayDescriptor {
    pub fn new(element_type: Arc<TypeDescriptor>, length: usize) -> Self {
        Self {
            element_type,
            length,
        }
    }
}
