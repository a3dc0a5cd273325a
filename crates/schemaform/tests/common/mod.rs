#![allow(dead_code)]

use std::path::PathBuf;

use schemaform::{FormSchema, FormValues};
use serde_json::Value;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn sample_schema() -> FormSchema {
    let path = fixture_path("sample_form.json");
    FormSchema::from_path(&path)
        .unwrap_or_else(|e| panic!("Failed to load {}: {e}", path.display()))
}

pub fn values(v: Value) -> FormValues {
    match v {
        Value::Object(map) => map,
        other => panic!("Expected a JSON object, got {other:?}"),
    }
}
