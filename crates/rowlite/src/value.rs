//! Scalar values and SQL literal rendering.
//!
//! [`Value`] is the only scalar currency of the crate: cursors yield it,
//! records store it, conditions and inserted data carry it. The two literal
//! renderings are deliberately asymmetric: WHERE clauses leave both integers
//! and floats bare, while
//! INSERT/SET quote everything except integers. Text is embedded with no
//! escaping; the parameterized mode exists for callers who need to be safe
//! against hostile input.

use serde::{Serialize, Serializer};
use std::fmt;

/// A scalar database value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    Text(String),
    /// SQL NULL
    Null,
}

impl Value {
    /// Render this value as a WHERE-clause literal.
    ///
    /// Integers and floats are embedded bare; text is single-quoted with no
    /// escaping; NULL renders as `NULL`.
    pub fn condition_literal(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Text(v) => format!("'{v}'"),
            Value::Null => "NULL".to_string(),
        }
    }

    /// Render this value as an INSERT/SET literal.
    ///
    /// Only integers are embedded bare; floats are quoted like text.
    pub fn write_literal(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Float(v) => format!("'{v}'"),
            Value::Text(v) => format!("'{v}'"),
            Value::Null => "NULL".to_string(),
        }
    }

    /// True if this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// The stringified form, as seen by regex filters: no quotes, NULL for null.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
            Value::Null => write!(f, "NULL"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Text(v) => serializer.serialize_str(v),
            Value::Null => serializer.serialize_none(),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
