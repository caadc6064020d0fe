#![no_main]
use libfuzzer_sys::fuzz_target;
use sxml::{generate, parse};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(doc) = parse(s) else {
        return;
    };
    if let Ok(written) = generate(&doc, "sxml") {
        assert_eq!(parse(&written).ok(), Some(doc));
    }
});
