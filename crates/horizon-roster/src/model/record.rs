//! Records: the items a list is backed by.
//!
//! A list can hold any type implementing [`ListRecord`]. For data that
//! arrives untyped (mock fixtures, query results), [`Record`] is a generic
//! id-plus-fields record that implements the trait out of the box.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable, opaque identifier of a record within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A displayable field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    String(String),
}

impl FieldValue {
    /// Returns the value as a string slice, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the value as an integer, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Renders the value the way it is shown in a table cell.
    pub fn display_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Int(n) => write!(f, "{n}"),
            FieldValue::Float(n) => write!(f, "{n}"),
            FieldValue::String(s) => f.write_str(s),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Int(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Int(i64::from(n))
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::Int(i64::from(n))
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Float(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// Trait for items that can be listed, searched and reordered.
///
/// # Example
///
/// ```
/// use horizon_roster::model::{FieldValue, ListRecord, RecordId};
///
/// struct Category {
///     id: RecordId,
///     name: String,
/// }
///
/// impl ListRecord for Category {
///     fn id(&self) -> &RecordId {
///         &self.id
///     }
///
///     fn field(&self, name: &str) -> Option<FieldValue> {
///         match name {
///             "name" => Some(FieldValue::from(self.name.as_str())),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait ListRecord {
    /// The record's stable identifier.
    fn id(&self) -> &RecordId;

    /// Returns the value of the named field, or `None` if the record has no
    /// such field.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

impl<T: ListRecord + ?Sized> ListRecord for &T {
    fn id(&self) -> &RecordId {
        (**self).id()
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        (**self).field(name)
    }
}

/// A generic record: an id plus named field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stable identifier.
    pub id: RecordId,
    /// Field values by name.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Creates a record with no fields.
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds a field, builder-style.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Sets a field value, replacing any previous one.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Returns a field value by reference.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Parses a JSON array of records, as produced by fixtures or a query.
    pub fn list_from_json(json: &str) -> serde_json::Result<Vec<Record>> {
        serde_json::from_str(json)
    }
}

impl ListRecord for Record {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        self.fields.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::from("Alpha").display_text(), "Alpha");
        assert_eq!(FieldValue::from(42).display_text(), "42");
        assert_eq!(FieldValue::from(1.5).display_text(), "1.5");
        assert_eq!(FieldValue::from(true).display_text(), "true");
    }

    #[test]
    fn test_record_builder_and_lookup() {
        let record = Record::new("1")
            .with_field("name", "Quarterly report.pdf")
            .with_field("size", 2048);

        assert_eq!(record.id().as_str(), "1");
        assert_eq!(
            record.field("name").and_then(|v| v.as_str().map(str::to_owned)),
            Some("Quarterly report.pdf".to_string())
        );
        assert_eq!(record.get("size").and_then(FieldValue::as_int), Some(2048));
        assert!(record.field("missing").is_none());
    }

    #[test]
    fn test_records_from_json() {
        let json = r#"[
            {"id": "a", "fields": {"name": "Alpha", "members": 3, "active": true}},
            {"id": "b", "fields": {"name": "Beta", "score": 4.5}},
            {"id": "c"}
        ]"#;

        let records = Record::list_from_json(json).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].get("members"), Some(&FieldValue::Int(3)));
        assert_eq!(records[0].get("active"), Some(&FieldValue::Bool(true)));
        assert_eq!(records[1].get("score"), Some(&FieldValue::Float(4.5)));
        assert!(records[2].fields.is_empty());
    }
}
