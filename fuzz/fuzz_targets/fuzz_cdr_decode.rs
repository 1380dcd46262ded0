// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use rtc_reserializer::{ByteOrder, Reserializer, TypeRegistry};

fuzz_target!(|data: &[u8]| {
    // First byte picks the type, second the byte order
    let [selector, order, body @ ..] = data else {
        return;
    };

    let registry = TypeRegistry::rtc();
    let names: Vec<&str> = registry.names().collect();
    let name = names[*selector as usize % names.len()];
    let order = if order & 1 == 0 {
        ByteOrder::Little
    } else {
        ByteOrder::Big
    };

    let Ok(reser) = Reserializer::from_registry(&registry, name, order) else {
        return;
    };

    // Whatever decodes must re-encode to the same layout, differing only in
    // alignment padding and tolerated trailing zeros
    if let Ok(text) = reser.binary_to_text(body) {
        let cdr = reser.text_to_binary(&text).expect("decoded record must re-encode");
        assert!(cdr.len() <= body.len() && body.len() - cdr.len() < 8);
        assert!(body[cdr.len()..].iter().all(|&b| b == 0));

        // The canonical encoding is a fixed point
        let again = reser.binary_to_text(&cdr).expect("re-encoded record must decode");
        assert_eq!(text, again);
        assert_eq!(reser.text_to_binary(&again).expect("re-encode"), cdr);
    }
});
