//! Field mapping table backed by a YAML properties document.
//!
//! Nested keys are joined with `.`, so
//!
//! ```yaml
//! log_*:
//!   name: newName
//!   age: person.age
//! ```
//!
//! defines the properties `log_*.name` and `log_*.age`. Resolving field `name`
//! in scope `log_*` looks up the property `log_*.name`.

use anyhow::{Context, Result, bail};
use odata_syntax::FieldResolver;
use serde_yaml_ng::Value;
use std::{collections::BTreeMap, fs, path::Path};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMappings {
    properties: BTreeMap<String, String>,
}

impl FieldMappings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::new());
        }
        let document: Value = serde_yaml_ng::from_str(yaml).context("Parse field mappings failed.")?;
        let mut mappings = Self::new();
        match document {
            Value::Null => {}
            Value::Mapping(_) => flatten(&document, String::new(), &mut mappings.properties)?,
            _ => bail!("field mappings must be a YAML mapping at the top level"),
        }
        Ok(mappings)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("Read field mappings from {} failed.", path.display()))?;
        let mappings = Self::from_yaml_str(&yaml)
            .with_context(|| format!("Load field mappings from {} failed.", path.display()))?;
        info!(path = %path.display(), properties = mappings.len(), "loaded field mappings");
        Ok(mappings)
    }

    /// Adds or replaces the physical name for `field` in `scope`.
    pub fn insert(
        &mut self,
        scope: &str,
        field: &str,
        physical: impl Into<String>,
    ) -> Option<String> {
        self.properties
            .insert(property_key(scope, field), physical.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl FieldResolver for FieldMappings {
    fn resolve(&self, scope: &str, field: &str) -> Option<String> {
        let key = property_key(scope, field);
        debug!(key = %key, "resolving property");
        self.properties.get(&key).cloned()
    }
}

fn property_key(scope: &str, field: &str) -> String {
    format!("{scope}.{field}")
}

fn flatten(value: &Value, prefix: String, out: &mut BTreeMap<String, String>) -> Result<()> {
    match value {
        Value::Mapping(map) => {
            for (key, child) in map {
                let key = scalar_text(key)
                    .with_context(|| format!("unsupported key under '{prefix}'"))?;
                let path = if prefix.is_empty() {
                    key
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(child, path, out)?;
            }
        }
        Value::Null => {}
        Value::Sequence(_) => bail!("sequences are not supported as field mappings (at '{prefix}')"),
        other => {
            let text = scalar_text(other)
                .with_context(|| format!("unsupported value at '{prefix}'"))?;
            out.insert(prefix, text);
        }
    }
    Ok(())
}

fn scalar_text(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => bail!("expected a scalar, found {other:?}"),
    }
}
