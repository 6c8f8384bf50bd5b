#![allow(dead_code)]
//! Shared helpers for `odata-elk` integration tests.

use odata_elk::*;
use serde_json::Value;

pub const SCOPE: &str = "log_*";

pub const MAPPINGS_YAML: &str = r#"
log_*:
  name: newName
  age: person.age
  city: address.city
  status: status.keyword
  created: "@timestamp"
"#;

pub fn mappings() -> FieldMappings {
    FieldMappings::from_yaml_str(MAPPINGS_YAML).unwrap()
}

pub fn options(select: &str, top: i64, offset: i64) -> QueryOptions {
    QueryOptions {
        select: select.to_string(),
        top,
        offset,
        ..QueryOptions::default()
    }
}

pub fn document(filter: &str) -> Value {
    document_with(filter, &QueryOptions::default())
}

pub fn document_with(filter: &str, options: &QueryOptions) -> Value {
    let text = transform(&mappings(), SCOPE, filter, options).unwrap();
    serde_json::from_str(&text).unwrap()
}

pub fn query(filter: &str) -> Value {
    document(filter)["query"].clone()
}

pub fn transform_err(filter: &str, options: &QueryOptions) -> TransformError {
    transform(&mappings(), SCOPE, filter, options).unwrap_err()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}
