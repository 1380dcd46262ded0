// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record type descriptors and the RTC type registry.
//!
//! A [`TypeDescriptor`] is the runtime schema of one record shape. The
//! [`TypeRegistry`] maps qualified names (`RTC.TimedPose2D`) to descriptors
//! and is populated explicitly; names are looked up, never evaluated.

mod builder;
mod registry;
mod rtc;
mod type_descriptor;

pub use builder::TypeDescriptorBuilder;
pub use registry::{RegistryError, TypeRegistry};
pub use rtc::{resolve_type_name, RTC_PREFIX};
pub use type_descriptor::{
    ArrayDescriptor, FieldDescriptor, PrimitiveKind, SequenceDescriptor, TypeDescriptor, TypeKind,
};
