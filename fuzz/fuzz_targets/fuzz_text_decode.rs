// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use rtc_reserializer::{ByteOrder, Reserializer, TypeRegistry};

fuzz_target!(|data: &[u8]| {
    let Some((selector, body)) = data.split_first() else {
        return;
    };

    let registry = TypeRegistry::rtc();
    let names: Vec<&str> = registry.names().collect();
    let name = names[*selector as usize % names.len()];

    let Ok(reser) = Reserializer::from_registry(&registry, name, ByteOrder::Little) else {
        return;
    };

    // Fuzz JSON -> CDR
    if let Ok(cdr) = reser.text_slice_to_binary(body) {
        reser
            .binary_to_text(&cdr)
            .expect("encoded record must decode");
    }
});
