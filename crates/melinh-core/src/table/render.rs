//! Cell rendering policy.
//!
//! The policy is chosen by field name, not by value type: `image` renders as a
//! thumbnail, `schedule` as a short date with an hour suffix, everything else
//! as truncated text.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum characters of text shown in a cell.
pub const MAX_CELL_CHARS: usize = 50;

/// Field rendered as a thumbnail.
pub const IMAGE_FIELD: &str = "image";

/// Field rendered as a schedule.
pub const SCHEDULE_FIELD: &str = "schedule";

/// A rendered table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cell {
    /// Small circular image, value is the image reference
    Thumbnail(String),
    /// Localized short date plus hour, e.g. "4/3/2025 9:00"
    Schedule(String),
    /// Text, already truncated
    Text(String),
    /// Field absent on this row
    Missing,
}

impl Cell {
    /// Plain-text form for hosts without rich cells.
    pub fn display(&self) -> &str {
        match self {
            Cell::Thumbnail(s) | Cell::Schedule(s) | Cell::Text(s) => s,
            Cell::Missing => "",
        }
    }
}

/// Textual rendering of a value: strings verbatim, everything else as
/// compact JSON.
pub fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Truncate to [`MAX_CELL_CHARS`] characters, appending an ellipsis.
pub fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_CELL_CHARS {
        let mut out: String = text.chars().take(MAX_CELL_CHARS).collect();
        out.push_str("...");
        out
    } else {
        text.to_string()
    }
}

/// Render one field of a row.
pub fn render_cell(field: &str, value: Option<&Value>) -> Cell {
    let Some(value) = value else {
        return Cell::Missing;
    };

    match field {
        IMAGE_FIELD => {
            if let Value::String(src) = value {
                if !src.is_empty() {
                    return Cell::Thumbnail(src.clone());
                }
            }
        }
        SCHEDULE_FIELD => {
            if let Some(formatted) = format_schedule(value) {
                return Cell::Schedule(formatted);
            }
        }
        _ => {}
    }

    Cell::Text(truncate(&text_of(value)))
}

/// Format `{date, time: {hour}}` as "d/m/yyyy H:00".
pub fn format_schedule(value: &Value) -> Option<String> {
    let date = value.get("date").and_then(Value::as_str).and_then(parse_date)?;
    let date_text = format!("{}/{}/{}", date.day(), date.month(), date.year());

    match value.get("time").and_then(|t| t.get("hour")).and_then(Value::as_u64) {
        Some(hour) => Some(format!("{} {}:00", date_text, hour)),
        None => Some(date_text),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| s.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}
