//! # Document Loading
//!
//! Reads a YAML (or JSON, which is a YAML subset) file fully into memory and
//! converts it to a `serde_json::Value`. Schema validation runs on JSON
//! values, so every checker works on the converted tree.

use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;

/// Load a structured-data file.
///
/// # Errors
///
/// `LoadError::NotFound` when the path does not exist, `LoadError::Read` when
/// it cannot be read and `LoadError::Parse` when the content is not
/// well-formed YAML.
pub fn load(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let value = parse_yaml(&content).map_err(|reason| LoadError::Parse {
        path: path.to_path_buf(),
        reason,
    })?;

    tracing::debug!(path = %path.display(), kind = kind_of(&value), "loaded document");
    Ok(value)
}

/// Parse YAML text into a JSON value. An empty document parses to `null`.
pub fn parse_yaml(content: &str) -> Result<Value, String> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| format!("invalid YAML: {e}"))?;
    yaml_to_json_value(&yaml)
}

/// Short name of a value's kind, used in diagnostics.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Tags are dropped. Non-string scalar keys are stringified; sequence and
/// mapping keys are rejected.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent number {f} (NaN or infinite)"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    serde_yaml::Value::Null => "null".to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
