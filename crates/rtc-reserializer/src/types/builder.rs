// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Chained construction of struct descriptors.

use crate::types::{
    ArrayDescriptor, FieldDescriptor, PrimitiveKind, SequenceDescriptor, TypeDescriptor, TypeKind,
};
use std::sync::Arc;

/// Collects members of a named struct in declaration order.
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    name: String,
    members: Vec<FieldDescriptor>,
}

impl TypeDescriptorBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    fn member(mut self, name: impl Into<String>, kind: TypeKind) -> Self {
        self.members
            .push(FieldDescriptor::new(name, TypeDescriptor::anonymous(kind)));
        self
    }

    fn element(kind: PrimitiveKind) -> Arc<TypeDescriptor> {
        TypeDescriptor::anonymous(TypeKind::Primitive(kind))
    }

    pub fn field(self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.member(name, TypeKind::Primitive(kind))
    }

    /// Several members sharing one primitive kind (`x`, `y`, `z`).
    pub fn fields(self, names: &[&str], kind: PrimitiveKind) -> Self {
        names.iter().fold(self, |builder, name| builder.field(*name, kind))
    }

    /// Unbounded narrow string.
    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.field(name, PrimitiveKind::String { max_length: None })
    }

    /// Unbounded sequence of primitives.
    pub fn sequence_field(self, name: impl Into<String>, element_kind: PrimitiveKind) -> Self {
        self.sequence_of(name, Self::element(element_kind))
    }

    /// Sequence of primitives holding at most `max_length` elements.
    pub fn bounded_sequence_field(
        self,
        name: impl Into<String>,
        element_kind: PrimitiveKind,
        max_length: usize,
    ) -> Self {
        let seq = SequenceDescriptor::new(Self::element(element_kind), Some(max_length));
        self.member(name, TypeKind::Sequence(seq))
    }

    /// Unbounded sequence of any element type, including named records.
    pub fn sequence_of(self, name: impl Into<String>, element: Arc<TypeDescriptor>) -> Self {
        self.member(name, TypeKind::Sequence(SequenceDescriptor::new(element, None)))
    }

    pub fn array_field(
        self,
        name: impl Into<String>,
        element_kind: PrimitiveKind,
        length: usize,
    ) -> Self {
        let arr = ArrayDescriptor::new(Self::element(element_kind), length);
        self.member(name, TypeKind::Array(arr))
    }

    /// Member whose type is a registered record.
    pub fn nested_field(self, name: impl Into<String>, record: Arc<TypeDescriptor>) -> Self {
        self.member(name, TypeKind::Nested(record))
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::new(self.name, TypeKind::Struct(self.members))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member_kinds(desc: &TypeDescriptor) -> Vec<(&str, String)> {
        desc.fields()
            .unwrap_or_default()
            .iter()
            .map(|f| (f.name.as_str(), f.type_desc.describe()))
            .collect()
    }

    #[test]
    fn test_members_keep_declaration_order() {
        let desc = TypeDescriptorBuilder::new("RTC.Velocity2D")
            .fields(&["vx", "vy", "va"], PrimitiveKind::F64)
            .build();

        assert_eq!(desc.name, "RTC.Velocity2D");
        assert_eq!(
            member_kinds(&desc),
            [
                ("vx", "double".to_string()),
                ("vy", "double".to_string()),
                ("va", "double".to_string())
            ]
        );
    }

    #[test]
    fn test_collection_members() {
        let desc = TypeDescriptorBuilder::new("Scan")
            .field("seq", PrimitiveKind::U32)
            .sequence_field("ranges", PrimitiveKind::F32)
            .bounded_sequence_field("flags", PrimitiveKind::Octet, 16)
            .array_field("origin", PrimitiveKind::F64, 3)
            .string_field("frame")
            .build();

        assert_eq!(
            member_kinds(&desc),
            [
                ("seq", "unsigned long".to_string()),
                ("ranges", "sequence<float>".to_string()),
                ("flags", "sequence<octet>".to_string()),
                ("origin", "double[3]".to_string()),
                ("frame", "string".to_string()),
            ]
        );

        let flags = desc.field("flags").expect("flags");
        assert!(matches!(
            &flags.type_desc.kind,
            TypeKind::Sequence(seq) if seq.max_length == Some(16)
        ));
    }

    #[test]
    fn test_nested_and_sequence_of_records() {
        let point = Arc::new(
            TypeDescriptorBuilder::new("RTC.Point2D")
                .fields(&["x", "y"], PrimitiveKind::F64)
                .build(),
        );
        let path = TypeDescriptorBuilder::new("Path")
            .nested_field("start", point.clone())
            .sequence_of("waypoints", point)
            .build();

        assert_eq!(
            member_kinds(&path),
            [
                ("start", "struct RTC.Point2D".to_string()),
                ("waypoints", "sequence<struct RTC.Point2D>".to_string()),
            ]
        );
    }

    #[test]
    fn test_timed_shape_detection() {
        let time = Arc::new(
            TypeDescriptorBuilder::new("RTC.Time")
                .fields(&["sec", "nsec"], PrimitiveKind::U32)
                .build(),
        );
        let timed = TypeDescriptorBuilder::new("RTC.TimedLong")
            .nested_field("tm", time.clone())
            .field("data", PrimitiveKind::I32)
            .build();

        assert!(timed.is_timed());
        assert!(!time.is_timed());
    }
}
