// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! RTC data type catalogue.
//!
//! Basic types are `{ tm: RTC.Time, data: <scalar or sequence> }`.
//! Extended types are plain double-valued structs, each also registered
//! under a `Timed` prefix wrapped the same way.

use crate::types::{PrimitiveKind, TypeDescriptor, TypeDescriptorBuilder, TypeRegistry};
use std::sync::Arc;

/// Namespace prefix of every RTC data type.
pub const RTC_PREFIX: &str = "RTC.";

const STRING: PrimitiveKind = PrimitiveKind::String { max_length: None };
const WSTRING: PrimitiveKind = PrimitiveKind::WString { max_length: None };

const BASIC_SCALARS: &[(&str, PrimitiveKind)] = &[
    ("State", PrimitiveKind::I16),
    ("Short", PrimitiveKind::I16),
    ("Long", PrimitiveKind::I32),
    ("UShort", PrimitiveKind::U16),
    ("ULong", PrimitiveKind::U32),
    ("Float", PrimitiveKind::F32),
    ("Double", PrimitiveKind::F64),
    ("Char", PrimitiveKind::Char),
    ("WChar", PrimitiveKind::WChar),
    ("Boolean", PrimitiveKind::Bool),
    ("Octet", PrimitiveKind::Octet),
    ("String", STRING),
    ("WString", WSTRING),
];

// TimedState has no sequence counterpart.
const BASIC_SEQUENCES: &[(&str, PrimitiveKind)] = &[
    ("Short", PrimitiveKind::I16),
    ("Long", PrimitiveKind::I32),
    ("UShort", PrimitiveKind::U16),
    ("ULong", PrimitiveKind::U32),
    ("Float", PrimitiveKind::F32),
    ("Double", PrimitiveKind::F64),
    ("Char", PrimitiveKind::Char),
    ("WChar", PrimitiveKind::WChar),
    ("Boolean", PrimitiveKind::Bool),
    ("Octet", PrimitiveKind::Octet),
    ("String", STRING),
    ("WString", WSTRING),
];

fn qualified(name: &str) -> String {
    format!("{}{}", RTC_PREFIX, name)
}

fn doubles(name: &str, fields: &[&str]) -> TypeDescriptor {
    TypeDescriptorBuilder::new(qualified(name))
        .fields(fields, PrimitiveKind::F64)
        .build()
}

/// Register `name` and its `Timed` wrapper.
fn with_timed(
    registry: &mut TypeRegistry,
    time: &Arc<TypeDescriptor>,
    desc: TypeDescriptor,
) -> Arc<TypeDescriptor> {
    let bare = desc.name.trim_start_matches(RTC_PREFIX).to_string();
    let payload = registry.register(desc);
    registry.register(
        TypeDescriptorBuilder::new(qualified(&format!("Timed{}", bare)))
            .nested_field("tm", time.clone())
            .nested_field("data", payload.clone())
            .build(),
    );
    payload
}

fn timed_header(name: &str, time: &Arc<TypeDescriptor>) -> TypeDescriptorBuilder {
    TypeDescriptorBuilder::new(qualified(&format!("Timed{}", name)))
        .nested_field("tm", time.clone())
}

pub(super) fn register_all(registry: &mut TypeRegistry) {
    let time = registry.register(
        TypeDescriptorBuilder::new(qualified("Time"))
            .fields(&["sec", "nsec"], PrimitiveKind::U32)
            .build(),
    );

    for (name, kind) in BASIC_SCALARS {
        registry.register(timed_header(name, &time).field("data", *kind).build());
    }
    for (name, kind) in BASIC_SEQUENCES {
        registry.register(
            timed_header(&format!("{}Seq", name), &time)
                .sequence_field("data", *kind)
                .build(),
        );
    }

    // Extended 2D
    with_timed(registry, &time, doubles("RGBColour", &["r", "g", "b"]));
    let point2d = with_timed(registry, &time, doubles("Point2D", &["x", "y"]));
    with_timed(registry, &time, doubles("Vector2D", &["x", "y"]));
    let pose2d = with_timed(
        registry,
        &time,
        TypeDescriptorBuilder::new(qualified("Pose2D"))
            .nested_field("position", point2d)
            .field("heading", PrimitiveKind::F64)
            .build(),
    );
    let velocity2d = with_timed(registry, &time, doubles("Velocity2D", &["vx", "vy", "va"]));
    with_timed(registry, &time, doubles("Acceleration2D", &["ax", "ay"]));
    with_timed(
        registry,
        &time,
        TypeDescriptorBuilder::new(qualified("PoseVel2D"))
            .nested_field("pose", pose2d.clone())
            .nested_field("velocities", velocity2d)
            .build(),
    );
    let size2d = with_timed(registry, &time, doubles("Size2D", &["l", "w"]));
    with_timed(
        registry,
        &time,
        TypeDescriptorBuilder::new(qualified("Geometry2D"))
            .nested_field("pose", pose2d)
            .nested_field("size", size2d)
            .build(),
    );
    with_timed(
        registry,
        &time,
        doubles("Covariance2D", &["xx", "xy", "xt", "yy", "yt", "tt"]),
    );
    with_timed(
        registry,
        &time,
        doubles("PointCovariance2D", &["xx", "xy", "yy"]),
    );
    with_timed(registry, &time, doubles("Carlike", &["speed", "steeringAngle"]));
    with_timed(registry, &time, doubles("SpeedHeading2D", &["speed", "heading"]));

    // Extended 3D
    let point3d = with_timed(registry, &time, doubles("Point3D", &["x", "y", "z"]));
    let vector3d = with_timed(registry, &time, doubles("Vector3D", &["x", "y", "z"]));
    let orientation3d = with_timed(registry, &time, doubles("Orientation3D", &["r", "p", "y"]));
    let pose3d = with_timed(
        registry,
        &time,
        TypeDescriptorBuilder::new(qualified("Pose3D"))
            .nested_field("position", point3d)
            .nested_field("orientation", orientation3d.clone())
            .build(),
    );
    let velocity3d = with_timed(
        registry,
        &time,
        doubles("Velocity3D", &["vx", "vy", "vz", "vr", "vp", "va"]),
    );
    with_timed(
        registry,
        &time,
        doubles("AngularVelocity3D", &["avx", "avy", "avz"]),
    );
    with_timed(registry, &time, doubles("Acceleration3D", &["ax", "ay", "az"]));
    with_timed(
        registry,
        &time,
        doubles("AngularAcceleration3D", &["aax", "aay", "aaz"]),
    );
    with_timed(
        registry,
        &time,
        TypeDescriptorBuilder::new(qualified("PoseVel3D"))
            .nested_field("pose", pose3d.clone())
            .nested_field("velocities", velocity3d)
            .build(),
    );
    let size3d = with_timed(registry, &time, doubles("Size3D", &["l", "w", "h"]));
    with_timed(
        registry,
        &time,
        TypeDescriptorBuilder::new(qualified("Geometry3D"))
            .nested_field("pose", pose3d)
            .nested_field("size", size3d)
            .build(),
    );
    with_timed(
        registry,
        &time,
        doubles(
            "Covariance3D",
            &[
                "xx", "xy", "xz", "xr", "xp", "xa", "yy", "yz", "yr", "yp", "ya", "zz", "zr",
                "zp", "za", "rr", "rp", "ra", "pp", "pa", "aa",
            ],
        ),
    );
    with_timed(
        registry,
        &time,
        TypeDescriptorBuilder::new(qualified("SpeedHeading3D"))
            .field("speed", PrimitiveKind::F64)
            .nested_field("direction", orientation3d)
            .build(),
    );
    with_timed(
        registry,
        &time,
        TypeDescriptorBuilder::new(qualified("OAP"))
            .nested_field("orientation", vector3d.clone())
            .nested_field("approach", vector3d.clone())
            .nested_field("position", vector3d)
            .build(),
    );
}

/// Map a middleware data type identifier to its qualified registry name.
///
/// Accepts repository ids (`IDL:RTC/TimedLong:1.0`), scoped names
/// (`RTC/TimedLong`, `RTC::TimedLong`, `RTC.TimedLong`) and bare names
/// (`TimedLong`). Bare names are placed in the `RTC` namespace.
pub fn resolve_type_name(identifier: &str) -> String {
    let mut name = identifier.trim();
    if let Some(rest) = name.strip_prefix("IDL:") {
        name = rest;
        // Trailing ":<major>.<minor>" version
        if let Some((scoped, _version)) = name.rsplit_once(':') {
            name = scoped;
        }
    }

    let dotted = name.replace("::", ".").replace('/', ".");
    if dotted.contains('.') {
        dotted
    } else {
        qualified(&dotted)
    }
}
