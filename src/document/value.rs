//! Format-neutral value tree for document content.
//!
//! Documents arrive as property lists or JSON. Everything except the
//! `buttonModels` subtree is carried through as a [`Value`] without being
//! interpreted, so unknown fields survive a load/edit/save cycle.

use std::collections::BTreeMap;

/// Dictionary node. Keys are kept sorted; source key order is not preserved.
pub type Dictionary = BTreeMap<String, Value>;

/// A node in a loaded document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON `null` (property lists have no equivalent)
    Null,
    Bool(bool),
    Integer(i64),
    /// Integer above `i64::MAX`
    Unsigned(u64),
    Real(f64),
    String(String),
    /// Raw bytes (property-list `<data>`)
    Data(Vec<u8>),
    /// Property-list `<date>`
    Date(plist::Date),
    /// Binary property-list object reference
    Uid(u64),
    Array(Vec<Value>),
    Dictionary(Dictionary),
}

impl Value {
    /// Numeric value as `f64`, accepting both integers and reals.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Unsigned(u) => Some(*u as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Value::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Short type name for log messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) | Value::Unsigned(_) => "integer",
            Value::Real(_) => "real",
            Value::String(_) => "string",
            Value::Data(_) => "data",
            Value::Date(_) => "date",
            Value::Uid(_) => "uid",
            Value::Array(_) => "array",
            Value::Dictionary(_) => "dictionary",
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Dictionary> for Value {
    fn from(value: Dictionary) -> Self {
        Value::Dictionary(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}
