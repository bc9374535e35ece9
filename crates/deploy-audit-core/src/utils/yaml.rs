//! YAML helpers shared by the compose and monitoring phases.

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

/// Errors loading a YAML document.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum YamlError {
    /// The file could not be read.
    #[error("{source}")]
    #[diagnostic(code(deploy_audit::yaml::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The document is not valid YAML.
    #[error("{0}")]
    #[diagnostic(code(deploy_audit::yaml::parse))]
    Parse(#[from] serde_yaml::Error),

    /// The document parsed, but its root is not a mapping.
    #[error("document root is not a mapping")]
    #[diagnostic(
        code(deploy_audit::yaml::not_a_mapping),
        help("the file must contain top-level `key: value` entries")
    )]
    NotAMapping,

    /// A key holds a value of the wrong kind.
    #[error("`{key}` is not a {expected}")]
    #[diagnostic(code(deploy_audit::yaml::shape))]
    Shape {
        /// The offending key.
        key: String,
        /// The kind of value the key must hold.
        expected: &'static str,
    },
}

/// Reads a YAML file whose root must be a mapping.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid YAML, or its
/// root is anything other than a mapping (including an empty document).
pub fn read_mapping(path: &Path) -> Result<Mapping, YamlError> {
    let content = std::fs::read_to_string(path).map_err(|e| YamlError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    match serde_yaml::from_str::<Value>(&content)? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Tagged(tagged) => match tagged.value {
            Value::Mapping(mapping) => Ok(mapping),
            _ => Err(YamlError::NotAMapping),
        },
        _ => Err(YamlError::NotAMapping),
    }
}

/// Borrows a (possibly tagged) mapping value.
#[must_use]
pub fn as_mapping(value: &Value) -> Option<&Mapping> {
    match value {
        Value::Mapping(map) => Some(map),
        Value::Tagged(tagged) => as_mapping(&tagged.value),
        _ => None,
    }
}

/// Presence test for optional keys: null, `false`, zero, and empty
/// strings or collections count as absent.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(seq) => !seq.is_empty(),
        Value::Mapping(map) => !map.is_empty(),
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

/// Renders a scalar as a string. Collections and null yield `None`.
#[must_use]
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Keys of a mapping value, in document order. Anything else yields no keys.
#[must_use]
pub fn mapping_keys(value: &Value) -> Vec<String> {
    match value {
        Value::Mapping(map) => map.keys().filter_map(scalar_to_string).collect(),
        Value::Tagged(tagged) => mapping_keys(&tagged.value),
        _ => Vec::new(),
    }
}

/// Converts a YAML value into JSON.
///
/// Non-string mapping keys are rendered with [`scalar_to_string`]; keys that
/// are themselves collections are dropped. Tags are discarded.
#[must_use]
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => number_to_json(n),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(seq) => serde_json::Value::Array(seq.iter().map(to_json).collect()),
        Value::Mapping(map) => serde_json::Value::Object(
            map.iter()
                .filter_map(|(k, v)| scalar_to_string(k).map(|k| (k, to_json(v))))
                .collect(),
        ),
        Value::Tagged(tagged) => to_json(&tagged.value),
    }
}

fn number_to_json(n: &serde_yaml::Number) -> serde_json::Value {
    if let Some(i) = n.as_i64() {
        serde_json::Value::from(i)
    } else if let Some(u) = n.as_u64() {
        serde_json::Value::from(u)
    } else {
        n.as_f64()
            .and_then(serde_json::Number::from_f64)
            .map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}
