//! Decoded record value tree
//!
//! Journal-stream records decode into a dynamically-shaped tree: maps,
//! sequences, scalars, blobs and timestamps. The stream format permits any
//! field to be absent at any level, so every accessor here returns an
//! `Option` — absence is routine, not an error. Null and absence are
//! equivalent for notification decisions.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A decoded journal-stream value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit null
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Integer scalar
    Int(i64),
    /// Decimal scalar
    Decimal(f64),
    /// Text scalar
    Text(String),
    /// Point-in-time scalar
    Timestamp(DateTime<Utc>),
    /// Opaque binary blob (document hashes, digests)
    Blob(Vec<u8>),
    /// Ordered sequence
    List(Vec<Value>),
    /// Field-name keyed mapping. Keys are unique; insertion order is
    /// irrelevant for lookup.
    Struct(HashMap<String, Value>),
}

impl Value {
    /// Check for explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as boolean, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as decimal. Integers widen losslessly enough for comparison use.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Decimal(d) => Some(*d),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as text, if this is a text scalar.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as timestamp, if this is a timestamp.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Get as blob bytes, if this is a blob.
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(b) => Some(b),
            _ => None,
        }
    }

    /// Get as sequence, if this is a sequence.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get as mapping, if this is a mapping.
    pub fn as_struct(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Look up a field on a mapping. `None` when this is not a mapping or
    /// the field is absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_struct().and_then(|fields| fields.get(name))
    }

    /// Walk a path of nested mapping fields, tolerant of any missing
    /// intermediate map.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(self, |value, name| value.get(name))
    }

    /// Check that a field is present on a mapping. A present-but-null field
    /// counts as present.
    pub fn has_field(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Plain string representation for message interpolation. Text renders
    /// unquoted; everything else renders in its natural literal form.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Text(s) => s.clone(),
            Value::Timestamp(ts) => ts.to_rfc3339(),
            Value::Blob(b) => {
                use base64::{engine::general_purpose::STANDARD, Engine as _};
                STANDARD.encode(b)
            }
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(Value::to_text).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Struct(fields) => {
                let mut parts: Vec<String> = fields
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v.to_text()))
                    .collect();
                parts.sort();
                format!("{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
