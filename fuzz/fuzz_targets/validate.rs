#![no_main]
use libfuzzer_sys::fuzz_target;
use sxml::{compile_schema, parse};

// Input is a schema and a document separated by a NUL byte
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let (schema, doc) = s.split_once('\0').unwrap_or((s, "(doc)"));
    if let (Ok(schema), Ok(doc)) = (parse(schema), parse(doc)) {
        if let Ok(schema) = compile_schema(&schema) {
            let _ = schema.validate(&doc);
        }
    }
});
