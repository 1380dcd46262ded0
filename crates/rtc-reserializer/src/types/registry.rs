// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Name-keyed registry of record type descriptors.

use crate::types::TypeDescriptor;
use crate::value::Record;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Registry lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown type '{0}'")]
    UnknownType(String),
}

/// Registry mapping qualified type names to descriptors.
///
/// Populated once at startup and read-only afterwards, so it can be
/// shared across threads behind an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the full RTC data type catalogue.
    #[must_use]
    pub fn rtc() -> Self {
        let mut registry = Self::new();
        super::rtc::register_all(&mut registry);
        registry
    }

    /// Register a descriptor under its own name, replacing any previous entry.
    pub fn register(&mut self, desc: TypeDescriptor) -> Arc<TypeDescriptor> {
        let desc = Arc::new(desc);
        self.types.insert(desc.name.clone(), desc.clone());
        desc
    }

    /// Look up a descriptor by qualified name.
    pub fn get(&self, name: &str) -> Result<Arc<TypeDescriptor>, RegistryError> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownType(name.to_string()))
    }

    /// Returns `true` if the name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Iterate over all descriptors, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.types.values()
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Zero-initialized record of the named type.
    pub fn zero_value(&self, name: &str) -> Result<Record, RegistryError> {
        let desc = self.get(name)?;
        Ok(Record::zero(&desc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PrimitiveKind, TypeDescriptorBuilder};
    use crate::value::RecordValue;

    #[test]
    fn test_register_and_get() {
        let mut registry = TypeRegistry::new();
        assert!(registry.is_empty());

        registry.register(
            TypeDescriptorBuilder::new("Custom.Reading")
                .field("id", PrimitiveKind::U32)
                .build(),
        );

        assert!(registry.contains("Custom.Reading"));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("Custom.Reading").map(|d| d.name.clone()),
            Ok("Custom.Reading".to_string())
        );
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let registry = TypeRegistry::rtc();
        assert_eq!(
            registry.get("RTC.NoSuchType").unwrap_err(),
            RegistryError::UnknownType("RTC.NoSuchType".into())
        );
        assert!(registry.zero_value("TimedLong").is_err());
    }

    #[test]
    fn test_zero_value() {
        let registry = TypeRegistry::rtc();
        let zero = registry.zero_value("RTC.TimedPose2D").expect("registered");

        assert_eq!(zero.type_name(), "RTC.TimedPose2D");
        assert_eq!(
            zero.value().get_path("tm.sec"),
            Some(&RecordValue::U32(0))
        );
        assert_eq!(
            zero.value().get_path("data.position.y"),
            Some(&RecordValue::F64(0.0))
        );
    }

    #[test]
    fn test_names_sorted() {
        let registry = TypeRegistry::rtc();
        let names: Vec<_> = registry.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
