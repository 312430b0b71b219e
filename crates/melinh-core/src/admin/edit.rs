//! Edit modal: draft lifecycle and per-field editors.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::models::{CollectionKind, Record, ID_FIELD};
use crate::table::{text_of, IMAGE_FIELD};

/// Editor widget for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldEditor {
    /// The identifier is shown but never edited
    ReadOnly,
    /// URL input for image references
    Url,
    /// Multi-line JSON editor for nested values and nulls
    Structured,
    /// Plain single-line input
    Text,
}

/// Pick the editor by field name, then by the current value's shape.
pub fn editor_for(name: &str, value: &Value) -> FieldEditor {
    match (name, value) {
        (ID_FIELD, _) => FieldEditor::ReadOnly,
        (IMAGE_FIELD, _) => FieldEditor::Url,
        (_, Value::Object(_) | Value::Array(_) | Value::Null) => FieldEditor::Structured,
        _ => FieldEditor::Text,
    }
}

/// One row of the edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldView {
    pub name: String,
    pub editor: FieldEditor,
    /// Current contents of the input
    pub text: String,
}

/// Why a field input was refused. The draft is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInputError {
    ReadOnly,
    UnknownField,
    InvalidStructured(String),
}

/// Edit modal state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditSession {
    #[default]
    Idle,
    Editing {
        kind: CollectionKind,
        draft: Record,
    },
}

impl EditSession {
    /// Open the modal on a copy of `record`.
    pub fn begin(kind: CollectionKind, record: Record) -> Self {
        EditSession::Editing { kind, draft: record }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, EditSession::Editing { .. })
    }

    pub fn draft(&self) -> Option<&Record> {
        match self {
            EditSession::Editing { draft, .. } => Some(draft),
            EditSession::Idle => None,
        }
    }

    /// Form rows for the draft, in field order.
    pub fn fields(&self) -> Vec<FieldView> {
        let Some(draft) = self.draft() else {
            return Vec::new();
        };

        draft
            .fields()
            .map(|(name, value)| {
                let editor = editor_for(name, value);
                let text = match editor {
                    FieldEditor::Structured => {
                        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
                    }
                    _ => text_of(value),
                };
                FieldView {
                    name: name.to_string(),
                    editor,
                    text,
                }
            })
            .collect()
    }

    /// Apply one keystroke's worth of input to the draft.
    pub fn apply(&mut self, name: &str, input: &str) -> Result<(), FieldInputError> {
        let EditSession::Editing { draft, .. } = self else {
            return Err(FieldInputError::UnknownField);
        };
        let current = draft.get(name).ok_or(FieldInputError::UnknownField)?;

        let value = match editor_for(name, current) {
            FieldEditor::ReadOnly => return Err(FieldInputError::ReadOnly),
            FieldEditor::Url => Value::String(input.to_string()),
            FieldEditor::Structured => serde_json::from_str(input)
                .map_err(|e| FieldInputError::InvalidStructured(e.to_string()))?,
            FieldEditor::Text => coerce_text(current, input),
        };

        draft.set(name, value);
        Ok(())
    }
}

/// Keep the scalar kind of `current` when the input parses as that kind.
fn coerce_text(current: &Value, input: &str) -> Value {
    match current {
        Value::Number(_) => {
            let trimmed = input.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                return Value::from(i);
            }
            if let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
                return Value::Number(n);
            }
        }
        Value::Bool(_) => match input.trim() {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        },
        _ => {}
    }
    Value::String(input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn editing(record: Record) -> EditSession {
        EditSession::begin(CollectionKind::Doctors, record)
    }

    #[test]
    fn test_editor_selection() {
        assert_eq!(editor_for("id", &json!(1)), FieldEditor::ReadOnly);
        assert_eq!(editor_for("image", &json!("a.png")), FieldEditor::Url);
        assert_eq!(editor_for("schedule", &json!({"date": "2025-01-01"})), FieldEditor::Structured);
        assert_eq!(editor_for("tags", &json!(["a"])), FieldEditor::Structured);
        assert_eq!(editor_for("name", &json!("A")), FieldEditor::Text);
        assert_eq!(editor_for("note", &Value::Null), FieldEditor::Structured);
    }

    #[test]
    fn test_null_field_stays_json() {
        let mut session = editing(Record::new(1).with("note", Value::Null));
        assert_eq!(session.fields()[1].text, "null");

        session.apply("note", "null").unwrap();
        assert_eq!(session.draft().unwrap().get("note"), Some(&Value::Null));

        session.apply("note", r#""call back""#).unwrap();
        assert_eq!(session.draft().unwrap().get("note"), Some(&json!("call back")));

        assert!(session.apply("note", "call back").is_err());
    }

    #[test]
    fn test_text_input_keeps_number_kind() {
        let mut session = editing(Record::new(1).with("price", 100).with("name", "A"));

        session.apply("price", "250").unwrap();
        assert_eq!(session.draft().unwrap().get("price"), Some(&json!(250)));

        session.apply("price", "12.5").unwrap();
        assert_eq!(session.draft().unwrap().get("price"), Some(&json!(12.5)));

        session.apply("price", "free").unwrap();
        assert_eq!(session.draft().unwrap().get("price"), Some(&json!("free")));

        session.apply("name", "42").unwrap();
        assert_eq!(session.draft().unwrap().get("name"), Some(&json!("42")));
    }

    #[test]
    fn test_invalid_structured_input_keeps_prior_value() {
        let schedule = json!({"date": "2025-03-04", "time": {"hour": 9}});
        let mut session = editing(Record::new(1).with("schedule", schedule.clone()));

        let result = session.apply("schedule", "{\"date\": ");
        assert!(matches!(result, Err(FieldInputError::InvalidStructured(_))));
        assert_eq!(session.draft().unwrap().get("schedule"), Some(&schedule));

        session
            .apply("schedule", r#"{"date": "2025-03-05", "time": {"hour": 10}}"#)
            .unwrap();
        assert_eq!(
            session.draft().unwrap().get("schedule"),
            Some(&json!({"date": "2025-03-05", "time": {"hour": 10}}))
        );
    }

    #[test]
    fn test_id_is_read_only() {
        let mut session = editing(Record::new(1));
        assert_eq!(session.apply("id", "2"), Err(FieldInputError::ReadOnly));
        assert_eq!(session.draft().unwrap().id(), 1);
    }

    #[test]
    fn test_unknown_field_and_idle() {
        let mut session = editing(Record::new(1));
        assert_eq!(session.apply("nope", "x"), Err(FieldInputError::UnknownField));

        let mut idle = EditSession::Idle;
        assert_eq!(idle.apply("name", "x"), Err(FieldInputError::UnknownField));
        assert!(idle.fields().is_empty());
    }

    #[test]
    fn test_field_views() {
        let session = editing(
            Record::new(3)
                .with("image", "a.png")
                .with("schedule", json!({"date": "2025-03-04"})),
        );
        let fields = session.fields();

        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].editor, FieldEditor::ReadOnly);
        assert_eq!(fields[0].text, "3");
        assert_eq!(fields[1].editor, FieldEditor::Url);
        assert_eq!(fields[2].text, "{\n  \"date\": \"2025-03-04\"\n}");
    }
}
