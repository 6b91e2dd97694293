//! Hierarchical pipeline configuration.
//!
//! The pipeline is driven by a single YAML document with one section per
//! concern (`main`, `etl`, `data_check`, `modeling`). The document is
//! loaded once per invocation into an immutable tree and queried by
//! dotted path. Values keep their natural scalar type; no coercion
//! happens here — splitting the step selection string, for example, is
//! the selector's job.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::ConfigError;

/// Immutable configuration tree loaded from a YAML document.
#[derive(Debug, Clone)]
pub struct ConfigTree {
    root: Value,
}

impl ConfigTree {
    /// Loads a configuration tree from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parses a configuration tree from YAML text.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let root: Value = serde_yaml::from_str(contents)?;
        Ok(Self { root })
    }

    /// Looks up a raw value by dotted path (e.g. `"etl.min_price"`).
    pub fn get(&self, path: &str) -> Result<&Value, ConfigError> {
        let mut current = &self.root;
        for segment in path.split('.') {
            current = current
                .get(segment)
                .ok_or_else(|| ConfigError::MissingKey(path.to_string()))?;
        }
        Ok(current)
    }

    /// Looks up a string value by dotted path.
    pub fn str(&self, path: &str) -> Result<&str, ConfigError> {
        self.get(path)?.as_str().ok_or(ConfigError::WrongType {
            key: path.to_string(),
            expected: "string",
        })
    }

    /// Looks up a scalar (string, integer, float or boolean) by dotted path.
    pub fn scalar(&self, path: &str) -> Result<Scalar, ConfigError> {
        Scalar::from_value(self.get(path)?).ok_or(ConfigError::WrongType {
            key: path.to_string(),
            expected: "scalar",
        })
    }

    /// Looks up a nested mapping by dotted path, for further traversal or
    /// standalone serialization.
    pub fn subtree(&self, path: &str) -> Result<&Value, ConfigError> {
        let value = self.get(path)?;
        if value.is_mapping() {
            Ok(value)
        } else {
            Err(ConfigError::WrongType {
                key: path.to_string(),
                expected: "mapping",
            })
        }
    }
}

/// A typed scalar configuration value, kept in its natural type until it
/// is rendered into a step parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Int(i))
                } else {
                    n.as_f64().map(Self::Float)
                }
            }
            Value::Bool(b) => Some(Self::Bool(*b)),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => write!(f, "{s}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}
