//! Schemaless records.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Reserved identifier field.
pub const ID_FIELD: &str = "id";

/// Record validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("Record is not an object")]
    NotAnObject,

    #[error("Record has no integer id")]
    MissingId,
}

/// A single entity: an ordered map of field name to value with a required
/// integer `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Create a record holding only its id.
    pub fn new(id: i64) -> Self {
        let mut fields = Map::new();
        fields.insert(ID_FIELD.to_string(), Value::from(id));
        Self { fields }
    }

    /// Validate a field map.
    pub fn from_map(fields: Map<String, Value>) -> Result<Self, RecordError> {
        match fields.get(ID_FIELD) {
            Some(Value::Number(n)) if n.is_i64() => Ok(Self { fields }),
            _ => Err(RecordError::MissingId),
        }
    }

    /// Builder-style field setter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn id(&self) -> i64 {
        // from_map guarantees an i64 id and set() refuses to replace it
        self.fields.get(ID_FIELD).and_then(Value::as_i64).unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set a field. Returns false (and leaves the record untouched) when the
    /// write would break the id.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> bool {
        let name = name.into();
        let value = value.into();
        if name == ID_FIELD && !matches!(&value, Value::Number(n) if n.is_i64()) {
            return false;
        }
        self.fields.insert(name, value);
        true
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl TryFrom<Value> for Record {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Record::from_map(fields),
            _ => Err(RecordError::NotAnObject),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.into_value()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::deserialize(deserializer)?;
        Record::from_map(fields).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_record() {
        let record = Record::new(7).with("name", "Dr. Lan");
        assert_eq!(record.id(), 7);
        assert_eq!(record.get("name"), Some(&json!("Dr. Lan")));
        assert_eq!(record.field_names().collect::<Vec<_>>(), vec!["id", "name"]);
    }

    #[test]
    fn test_try_from_requires_integer_id() {
        assert!(Record::try_from(json!({"id": 1, "name": "A"})).is_ok());
        assert_eq!(
            Record::try_from(json!({"name": "A"})),
            Err(RecordError::MissingId)
        );
        assert_eq!(
            Record::try_from(json!({"id": "1"})),
            Err(RecordError::MissingId)
        );
        assert_eq!(Record::try_from(json!([1, 2])), Err(RecordError::NotAnObject));
    }

    #[test]
    fn test_id_cannot_be_overwritten_with_text() {
        let mut record = Record::new(3);
        assert!(!record.set("id", "three"));
        assert_eq!(record.id(), 3);
        assert!(record.set("id", 4));
        assert_eq!(record.id(), 4);
    }

    #[test]
    fn test_deserialize_preserves_field_order() {
        let record: Record =
            serde_json::from_str(r#"{"id": 1, "zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        assert_eq!(
            record.field_names().collect::<Vec<_>>(),
            vec!["id", "zeta", "alpha", "mid"]
        );
    }

    #[test]
    fn test_deserialize_rejects_missing_id() {
        let result: Result<Record, _> = serde_json::from_str(r#"{"name": "A"}"#);
        assert!(result.is_err());
    }
}
