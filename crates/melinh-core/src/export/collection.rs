//! Collection export and import.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::{ensure_unique_ids, CollectionError, CollectionKind, Record, RecordError};
use crate::table::{derive_columns, text_of, ColumnPolicy};

/// Export/import errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import file must contain a JSON array of records")]
    NotAnArray,

    #[error("Record {index} is invalid: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: RecordError,
    },

    #[error("Invalid collection: {0}")]
    Collection(#[from] CollectionError),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// A downloadable file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub contents: String,
}

/// `<lowercased label>.<extension>`
pub fn export_file_name(kind: CollectionKind, extension: &str) -> String {
    format!("{}.{}", kind.label().to_lowercase(), extension)
}

/// Export an entire collection as pretty-printed JSON.
pub fn export_json(kind: CollectionKind, records: &[Record]) -> ExportResult<ExportArtifact> {
    Ok(ExportArtifact {
        file_name: export_file_name(kind, "json"),
        mime_type: "application/json".to_string(),
        contents: serde_json::to_string_pretty(records)?,
    })
}

/// Export an entire collection as CSV, one column per field.
pub fn export_csv(kind: CollectionKind, records: &[Record]) -> ExportArtifact {
    let columns = derive_columns(records, ColumnPolicy::Union);
    let mut csv = String::new();

    // Header
    let header: Vec<String> = columns.iter().map(|c| escape_csv(c)).collect();
    csv.push_str(&header.join(","));
    csv.push('\n');

    // Lines
    for record in records {
        let line: Vec<String> = columns
            .iter()
            .map(|c| record.get(c).map(|v| escape_csv(&text_of(v))).unwrap_or_default())
            .collect();
        csv.push_str(&line.join(","));
        csv.push('\n');
    }

    ExportArtifact {
        file_name: export_file_name(kind, "csv"),
        mime_type: "text/csv".to_string(),
        contents: csv,
    }
}

/// Parse an import file into a validated record list.
pub fn parse_import(text: &str) -> ExportResult<Vec<Record>> {
    let Value::Array(items) = serde_json::from_str::<Value>(text)? else {
        return Err(ExportError::NotAnArray);
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            Record::try_from(item).map_err(|source| ExportError::InvalidRecord { index, source })
        })
        .collect::<ExportResult<Vec<_>>>()?;

    ensure_unique_ids(&records)?;
    Ok(records)
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_doctors() -> Vec<Record> {
        vec![
            Record::new(1)
                .with("name", "Dr. Nguyen Van A")
                .with("image", "https://cdn.example/a.png")
                .with("specialty", "Cardiology, Internal"),
            Record::new(2)
                .with("name", "Dr. Tran Thi B")
                .with("schedule", json!({"date": "2025-03-04", "time": {"hour": 9}})),
        ]
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(CollectionKind::Doctors, "json"), "doctors.json");
        assert_eq!(export_file_name(CollectionKind::Invoices, "csv"), "invoices.csv");
    }

    #[test]
    fn test_export_json_is_pretty_and_complete() {
        let artifact = export_json(CollectionKind::Doctors, &make_doctors()).unwrap();
        assert_eq!(artifact.file_name, "doctors.json");
        assert!(artifact.contents.contains("\n  {"));
        assert!(artifact.contents.contains("Dr. Tran Thi B"));
    }

    #[test]
    fn test_json_round_trip() {
        let records = make_doctors();
        let artifact = export_json(CollectionKind::Doctors, &records).unwrap();
        assert_eq!(parse_import(&artifact.contents).unwrap(), records);
    }

    #[test]
    fn test_export_csv() {
        let artifact = export_csv(CollectionKind::Doctors, &make_doctors());
        let lines: Vec<&str> = artifact.contents.lines().collect();

        assert_eq!(lines.len(), 3); // Header + 2 records
        assert_eq!(lines[0], "id,name,image,specialty,schedule");
        assert!(lines[1].contains("\"Cardiology, Internal\""));
        assert!(lines[2].starts_with("2,Dr. Tran Thi B,,,"));
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("line\r\nbreak"), "\"line\r\nbreak\"");
        assert_eq!(escape_csv("carriage\rreturn"), "\"carriage\rreturn\"");
    }

    #[test]
    fn test_import_rejects_bad_input() {
        assert!(matches!(parse_import("not json"), Err(ExportError::Json(_))));
        assert!(matches!(parse_import(r#"{"id": 1}"#), Err(ExportError::NotAnArray)));
        assert!(matches!(
            parse_import(r#"[{"id": 1}, {"name": "no id"}]"#),
            Err(ExportError::InvalidRecord { index: 1, .. })
        ));
        assert!(matches!(
            parse_import(r#"[{"id": 1}, {"id": 1}]"#),
            Err(ExportError::Collection(CollectionError::DuplicateId(1)))
        ));
    }

    #[test]
    fn test_import_empty_array() {
        assert!(parse_import("[]").unwrap().is_empty());
    }
}
