//! Opaque records displayed by a table.
//!
//! A [`Row`] is a JSON object as returned by the master-data API. The table
//! never assumes a fixed shape: columns and search fields address values by
//! key, and nested objects are reached with dotted paths such as
//! `department.name`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single record, keyed by field name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Direct top-level lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Resolve a dotted path through nested objects.
    ///
    /// A key that exists verbatim (dots included) wins over path traversal, so
    /// APIs that flatten relations as `"department.name"` keep working.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.0.get(path) {
            return Some(value);
        }

        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Display text of the value at `path`, if it has a textual form.
    pub fn text(&self, path: &str) -> Option<String> {
        self.lookup(path).and_then(value_text)
    }

    /// Iterate over top-level fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Row {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for Row {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}

/// Plain-text rendering of a scalar or array value.
///
/// `null` and objects have no text; arrays join their textual elements.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Object(_) => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(value_text).collect();
            Some(parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        Row::try_from(value).unwrap()
    }

    #[test]
    fn test_lookup_nested_path() {
        let r = row(json!({
            "name": "Hematology analyzer",
            "department": { "name": "Hematology", "code": "HEM" }
        }));

        assert_eq!(r.text("name").as_deref(), Some("Hematology analyzer"));
        assert_eq!(r.text("department.name").as_deref(), Some("Hematology"));
        assert!(r.lookup("department.missing").is_none());
        assert!(r.lookup("name.inner").is_none());
    }

    #[test]
    fn test_flattened_key_wins() {
        let r = row(json!({
            "department.name": "Flat",
            "department": { "name": "Nested" }
        }));
        assert_eq!(r.text("department.name").as_deref(), Some("Flat"));
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!(true)).as_deref(), Some("true"));
        assert_eq!(value_text(&json!(42)).as_deref(), Some("42"));
        assert_eq!(value_text(&json!(["a", 1, null])).as_deref(), Some("a, 1"));
        assert!(value_text(&json!(null)).is_none());
        assert!(value_text(&json!({ "a": 1 })).is_none());
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(Row::try_from(json!([1, 2])).is_err());
    }
}
