//! Raw index documents and highlight spans.
//!
//! A [`Document`] is whatever JSON object the index stored for one record.
//! Its shape differs per content type, so it stays untyped here and the
//! [`SearchHit`](crate::hit::SearchHit) adapter reads individual fields with
//! the lenient helpers below.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One matched record as returned by the index.
pub type Document = serde_json::Map<String, Value>;

/// A marked-up excerpt for one document field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    /// Document field the snippet was cut from.
    pub field: String,
    /// Excerpt with matched tokens wrapped in `<mark>` tags.
    pub snippet: String,
}

impl Highlight {
    /// Create a new highlight.
    pub fn new(field: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            snippet: snippet.into(),
        }
    }
}

/// Read a string field. Non-string values count as absent.
pub(crate) fn str_field<'a>(doc: &'a Document, key: &str) -> Option<&'a str> {
    doc.get(key).and_then(Value::as_str)
}

/// Read an integer field, accepting JSON integers, integral floats, and
/// numeric strings (the index stores some counters as strings).
pub(crate) fn int_field(doc: &Document, key: &str) -> Option<i64> {
    match doc.get(key)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read an identifier that may be stored as a string or an integer.
pub(crate) fn id_field(doc: &Document, key: &str) -> Option<String> {
    match doc.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
