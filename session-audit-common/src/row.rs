use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const ID_FIELD: &str = "id";
pub const SORT_ID_FIELD: &str = "sortId";

/// A single attribute as returned by the store.
///
/// Only string and number attributes are ever consulted. Everything else is
/// carried along verbatim (already in `{"<TAG>": value}` form) so that rows
/// can be echoed back in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrValue {
    S(String),
    N(String),
    #[serde(untagged)]
    Other(serde_json::Value),
}

impl AttrValue {
    pub fn s(value: impl Into<String>) -> Self {
        Self::S(value.into())
    }

    pub fn n(value: impl Into<String>) -> Self {
        Self::N(value.into())
    }

    /// Scalar view of the attribute: strings as-is, numbers in their
    /// textual wire form.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::S(s) | Self::N(s) => Some(s),
            Self::Other(_) => None,
        }
    }
}

/// A registry row. Field order is normalized so that echoed rows render
/// identically between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, AttrValue>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: AttrValue) -> Self {
        self.0.insert(field.into(), value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&AttrValue> {
        self.0.get(field)
    }

    pub fn attr_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(AttrValue::as_scalar)
    }

    /// Keeps only the named fields. An empty projection keeps everything.
    pub fn project(self, fields: &[String]) -> Self {
        if fields.is_empty() {
            return self;
        }
        Self(
            self.0
                .into_iter()
                .filter(|(k, _)| fields.iter().any(|f| f == k))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, AttrValue)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, AttrValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Builds a session-table row with string keys.
pub fn session_row(id: &str, sort_id: &str) -> Row {
    Row::new()
        .with(ID_FIELD, AttrValue::s(id))
        .with(SORT_ID_FIELD, AttrValue::s(sort_id))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_attr_str_reads_strings_and_numbers() {
        let row = Row::new()
            .with("id", AttrValue::s("S1"))
            .with("sortId", AttrValue::n("42"))
            .with("isExpired", AttrValue::Other(json!({ "BOOL": false })));

        assert_eq!(row.attr_str("id"), Some("S1"));
        assert_eq!(row.attr_str("sortId"), Some("42"));
        assert_eq!(row.attr_str("isExpired"), None);
        assert_eq!(row.attr_str("missing"), None);
    }

    #[test]
    fn test_row_serializes_in_store_form() {
        let row = Row::new()
            .with("sortId", AttrValue::s("U1"))
            .with("id", AttrValue::s("S1"))
            .with("date", AttrValue::n("1700000000000"))
            .with("isExpired", AttrValue::Other(json!({ "BOOL": true })));

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(
            value,
            json!({
                "date": { "N": "1700000000000" },
                "id": { "S": "S1" },
                "isExpired": { "BOOL": true },
                "sortId": { "S": "U1" },
            })
        );
    }

    #[test]
    fn test_row_deserializes_from_store_form() {
        let row: Row = serde_json::from_value(json!({
            "id": { "S": "S1" },
            "date": { "N": "12" },
            "tags": { "SS": ["a", "b"] },
        }))
        .unwrap();

        assert_eq!(row.get("id"), Some(&AttrValue::s("S1")));
        assert_eq!(row.get("date"), Some(&AttrValue::n("12")));
        assert_eq!(
            row.get("tags"),
            Some(&AttrValue::Other(json!({ "SS": ["a", "b"] })))
        );
    }

    #[test]
    fn test_project_keeps_named_fields() {
        let row = session_row("S1", "U1").with("location", AttrValue::s("Arkose"));

        let projected = row.clone().project(&["id".to_owned()]);
        assert_eq!(projected.len(), 1);
        assert_eq!(projected.attr_str("id"), Some("S1"));

        assert_eq!(row.clone().project(&[]), row);
    }
}
