use std::fs;
use sxml::{compile_schema, parse};

#[test]
fn test_valid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let valid_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/valid");
    for entry in fs::read_dir(valid_dir)? {
        let path = entry?.path();
        let content = fs::read_to_string(&path)?;
        if let Err(err) = parse(&content) {
            return Err(
                std::io::Error::other(format!("Failed to parse valid file {path:?}: {err}")).into(),
            );
        }
    }
    Ok(())
}

#[test]
fn test_invalid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let invalid_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/invalid");
    for entry in fs::read_dir(invalid_dir)? {
        let path = entry?.path();
        let content = fs::read_to_string(&path)?;
        if parse(&content).is_ok() {
            return Err(std::io::Error::other(format!(
                "Should fail to parse invalid file: {path:?}"
            ))
            .into());
        }
    }
    Ok(())
}

#[test]
fn test_page_fixture_matches_schema() -> Result<(), Box<dyn std::error::Error>> {
    let fixtures = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");
    let schema = fs::read_to_string(format!("{fixtures}/schema/page.schema.sxml"))?;
    let page = fs::read_to_string(format!("{fixtures}/valid/page.sxml"))?;

    let schema = compile_schema(&parse(&schema)?)?;
    schema.validate(&parse(&page)?)?;

    let broken = page.replace("(title", "(subtitle");
    assert!(schema.validate(&parse(&broken)?).is_err());
    Ok(())
}
