use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use sxml::{compile_schema, parse, Element};

const SCHEMA: &str = r#"(schema @start "list"
  (def-el list (* item))
  (def-el item name (? note))
  (def-el name)
  (def-el note)
  (def-attr item id)
  (def-attr id))"#;

fn list(items: usize) -> String {
    let body: String = (0..items)
        .map(|i| format!(r#"(item @id "{i}" (name `Item {i}) (note `n))"#))
        .collect();
    format!("(list {body})")
}

fn bench_compile(c: &mut Criterion) {
    c.bench_function("sxml_compile_schema", |b| {
        b.iter(|| parse(black_box(SCHEMA)).map(|s| compile_schema(&s)))
    });
}

fn bench_validate(c: &mut Criterion) {
    let (Ok(schema_doc), Ok(doc)) = (parse(SCHEMA), parse(&list(500))) else {
        return;
    };
    let Ok(schema) = compile_schema(&schema_doc) else {
        return;
    };
    c.bench_function("sxml_validate_500_items", |b| {
        b.iter(|| schema.validate(black_box::<&Element>(&doc)))
    });
}

criterion_group!(benches, bench_compile, bench_validate);
criterion_main!(benches);
