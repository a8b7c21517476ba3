//! Conversions between [`Value`] and the property-list and JSON value types.
//!
//! Neither target format represents every node type:
//! - JSON has no bytes or dates. Data is written as a base64 string and dates
//!   as their ISO-8601 text.
//! - Property lists have no null. Null nodes are omitted on write.
//! - JSON has no UIDs. They are written as plain numbers.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use super::value::{Dictionary, Value};

// ============================================================================
// Property list
// ============================================================================

pub(crate) fn from_plist(value: plist::Value) -> Value {
    match value {
        plist::Value::Boolean(b) => Value::Bool(b),
        plist::Value::Integer(i) => match (i.as_signed(), i.as_unsigned()) {
            (Some(signed), _) => Value::Integer(signed),
            (None, Some(unsigned)) => Value::Unsigned(unsigned),
            (None, None) => {
                log::warn!("Unrepresentable property list integer {:?}", i);
                Value::Real(f64::NAN)
            }
        },
        plist::Value::Real(r) => Value::Real(r),
        plist::Value::String(s) => Value::String(s),
        plist::Value::Data(bytes) => Value::Data(bytes),
        plist::Value::Date(date) => Value::Date(date),
        plist::Value::Uid(uid) => Value::Uid(uid.get()),
        plist::Value::Array(items) => Value::Array(items.into_iter().map(from_plist).collect()),
        plist::Value::Dictionary(dict) => Value::Dictionary(
            dict.into_iter()
                .map(|(key, value)| (key, from_plist(value)))
                .collect(),
        ),
        other => {
            log::warn!("Unsupported property list node {:?}, keeping as string", other);
            Value::String(format!("{:?}", other))
        }
    }
}

/// Convert for property-list output. Returns `None` for null.
pub(crate) fn to_plist(value: &Value) -> Option<plist::Value> {
    let converted = match value {
        Value::Null => return None,
        Value::Bool(b) => plist::Value::Boolean(*b),
        Value::Integer(i) => plist::Value::Integer((*i).into()),
        Value::Unsigned(u) => plist::Value::Integer((*u).into()),
        Value::Real(r) => plist::Value::Real(*r),
        Value::String(s) => plist::Value::String(s.clone()),
        Value::Data(bytes) => plist::Value::Data(bytes.clone()),
        Value::Date(date) => plist::Value::Date(*date),
        Value::Uid(uid) => plist::Value::Uid(plist::Uid::new(*uid)),
        Value::Array(items) => plist::Value::Array(items.iter().filter_map(to_plist).collect()),
        Value::Dictionary(dict) => {
            let mut out = plist::Dictionary::new();
            for (key, value) in dict {
                if let Some(converted) = to_plist(value) {
                    out.insert(key.clone(), converted);
                }
            }
            plist::Value::Dictionary(out)
        }
    };
    Some(converted)
}

// ============================================================================
// JSON
// ============================================================================

pub(crate) fn from_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => Value::Integer(i),
            (None, Some(u)) => Value::Unsigned(u),
            (None, None) => Value::Real(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::Array(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(map) => Value::Dictionary(
            map.into_iter()
                .map(|(key, value)| (key, from_json(value)))
                .collect::<Dictionary>(),
        ),
    }
}

pub(crate) fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::Unsigned(u) | Value::Uid(u) => serde_json::Value::from(*u),
        // Non-finite reals have no JSON spelling and become null
        Value::Real(r) => serde_json::Number::from_f64(*r)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Data(bytes) => serde_json::Value::String(BASE64.encode(bytes)),
        Value::Date(date) => serde_json::Value::String(date.to_xml_format()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Dictionary(dict) => serde_json::Value::Object(
            dict.iter()
                .map(|(key, value)| (key.clone(), to_json(value)))
                .collect(),
        ),
    }
}
