//! Typed access to decoded request documents.
//!
//! Requests arrive as a generic `serde_json::Value` tree. These accessors
//! turn "wrong kind of value" into a [`RequestError`] so a single malformed
//! request can be skipped instead of aborting the whole document.

use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("Missing key: {0}")]
    MissingKey(String),

    #[error("Type mismatch for {key}: expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Value out of range for {0}")]
    OutOfRange(String),

    #[error("Unknown request type: {0}")]
    UnknownType(String),

    #[error("Invalid bus number: {0}")]
    InvalidBusNumber(String),
}

pub type RequestResult<T> = std::result::Result<T, RequestError>;

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "double",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map",
    }
}

fn mismatch(key: &str, expected: &'static str, value: &Value) -> RequestError {
    RequestError::TypeMismatch {
        key: key.to_owned(),
        expected,
        found: kind_name(value),
    }
}

/// Scalar and container accessors; `context` names the value in errors.
pub trait NodeExt {
    fn as_map_node(&self, context: &str) -> RequestResult<&Map<String, Value>>;
    fn as_array_node(&self, context: &str) -> RequestResult<&[Value]>;
    fn as_int(&self, context: &str) -> RequestResult<i64>;
    fn as_double(&self, context: &str) -> RequestResult<f64>;
    fn as_string(&self, context: &str) -> RequestResult<&str>;
    fn as_boolean(&self, context: &str) -> RequestResult<bool>;

    /// Required key of a map node
    fn key(&self, key: &str) -> RequestResult<&Value> {
        self.opt_key(key)?
            .ok_or_else(|| RequestError::MissingKey(key.to_owned()))
    }

    /// Optional key of a map node
    fn opt_key(&self, key: &str) -> RequestResult<Option<&Value>>;

    fn int_at(&self, key: &str) -> RequestResult<i64> {
        self.key(key)?.as_int(key)
    }

    fn double_at(&self, key: &str) -> RequestResult<f64> {
        self.key(key)?.as_double(key)
    }

    fn str_at(&self, key: &str) -> RequestResult<&str> {
        self.key(key)?.as_string(key)
    }

    fn bool_at(&self, key: &str) -> RequestResult<bool> {
        self.key(key)?.as_boolean(key)
    }

    /// Array under `key`, or an empty slice when the key is absent
    fn array_or_empty(&self, key: &str) -> RequestResult<&[Value]> {
        match self.opt_key(key)? {
            Some(value) => value.as_array_node(key),
            None => Ok(&[]),
        }
    }
}

impl NodeExt for Value {
    fn as_map_node(&self, context: &str) -> RequestResult<&Map<String, Value>> {
        self.as_object().ok_or_else(|| mismatch(context, "map", self))
    }

    fn as_array_node(&self, context: &str) -> RequestResult<&[Value]> {
        self.as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| mismatch(context, "array", self))
    }

    // Doubles are not silently truncated.
    fn as_int(&self, context: &str) -> RequestResult<i64> {
        self.as_i64().ok_or_else(|| mismatch(context, "int", self))
    }

    // Integers widen to doubles.
    fn as_double(&self, context: &str) -> RequestResult<f64> {
        self.as_f64().ok_or_else(|| mismatch(context, "double", self))
    }

    fn as_string(&self, context: &str) -> RequestResult<&str> {
        self.as_str().ok_or_else(|| mismatch(context, "string", self))
    }

    fn as_boolean(&self, context: &str) -> RequestResult<bool> {
        Value::as_bool(self).ok_or_else(|| mismatch(context, "bool", self))
    }

    fn opt_key(&self, key: &str) -> RequestResult<Option<&Value>> {
        Ok(self.as_map_node(key)?.get(key))
    }
}
