//! Variable files and the dynamic values they hold.
//!
//! Every data file is a YAML mapping from variable name to an arbitrary
//! value. Values stay as `serde_yaml::Value` (scalar, sequence or mapping)
//! all the way to the template engine; this module only checks the shape at
//! the top level.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// A mapping from variable name to value.
///
/// Used for the global configuration, for each device overlay and for the
/// final render context.
pub type ConfigMapping = Mapping;

/// Parse YAML text that must contain a single top-level mapping.
///
/// `path` is only used to label errors.
pub fn parse_mapping(content: &str, path: &Path) -> Result<ConfigMapping> {
    let value: Value = serde_yaml::from_str(content).map_err(|e| Error::ParseFailure {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Err(Error::ParseFailure {
            path: path.to_path_buf(),
            message: "Invalid YAML or empty file".to_string(),
        }),
        other => Err(Error::ParseFailure {
            path: path.to_path_buf(),
            message: format!("expected a mapping at the top level, found {}", type_name(&other)),
        }),
    }
}

/// Read and parse a variable file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<ConfigMapping> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::ParseFailure {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_mapping(&content, path)
}

/// Render a mapping key for messages.
pub fn key_display(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => format!("{:?}", other),
    }
}

/// Render a scalar as plain text, or `None` for sequences and mappings.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        _ => None,
    }
}

/// Short name of a YAML value's type
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
