//! Wire types for the subset of the Google Sheets v4 REST API we call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `spreadsheets.values` resource. Sheets omits `values` entirely for an
/// empty range.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    /// Builds a request body from plain string rows.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        ValueRange {
            range: None,
            major_dimension: Some("ROWS".to_string()),
            values: rows
                .into_iter()
                .map(|row| row.into_iter().map(Value::String).collect())
                .collect(),
        }
    }
}

/// Spreadsheet metadata, trimmed by the `fields=sheets.properties.title` mask.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpreadsheetMeta {
    #[serde(default)]
    pub sheets: Vec<SheetEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SheetEntry {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SheetProperties {
    pub title: String,
}

/// Body of `spreadsheets.batchUpdate`, restricted to `addSheet`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchUpdateRequest {
    pub requests: Vec<SheetRequest>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetRequest {
    pub add_sheet: AddSheet,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddSheet {
    pub properties: SheetProperties,
}

impl BatchUpdateRequest {
    pub fn add_sheet(title: &str) -> Self {
        BatchUpdateRequest {
            requests: vec![SheetRequest {
                add_sheet: AddSheet {
                    properties: SheetProperties {
                        title: title.to_string(),
                    },
                },
            }],
        }
    }
}

/// Response of `values.append`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendValuesResponse {
    #[serde(default)]
    pub updates: Option<UpdateValuesResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    #[serde(default)]
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_rows: Option<u64>,
}

/// Renders a cell value as the text used for key comparison.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_range_without_values() {
        let parsed: ValueRange = serde_json::from_value(json!({
            "range": "'players-2026'!C1:D1000",
            "majorDimension": "ROWS"
        }))
        .unwrap();
        assert!(parsed.values.is_empty());
        assert_eq!(parsed.major_dimension.as_deref(), Some("ROWS"));
    }

    #[test]
    fn test_value_range_from_rows() {
        let body = ValueRange::from_rows(vec![vec!["a".to_string(), "1".to_string()]]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, json!({"majorDimension": "ROWS", "values": [["a", "1"]]}));
    }

    #[test]
    fn test_add_sheet_request_shape() {
        let json = serde_json::to_value(BatchUpdateRequest::add_sheet("players-2026")).unwrap();
        assert_eq!(
            json,
            json!({"requests": [{"addSheet": {"properties": {"title": "players-2026"}}}]})
        );
    }

    #[test]
    fn test_spreadsheet_meta_titles() {
        let meta: SpreadsheetMeta = serde_json::from_value(json!({
            "sheets": [
                {"properties": {"title": "players-2025"}},
                {"properties": {"title": "players-2026"}}
            ]
        }))
        .unwrap();
        let titles: Vec<_> = meta.sheets.iter().map(|s| s.properties.title.as_str()).collect();
        assert_eq!(titles, vec!["players-2025", "players-2026"]);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!("X1")), "X1");
        assert_eq!(cell_text(&json!(1629029)), "1629029");
        assert_eq!(cell_text(&json!(1629029.0)), "1629029.0");
        assert_eq!(cell_text(&json!(true)), "true");
        assert_eq!(cell_text(&Value::Null), "");
    }
}
