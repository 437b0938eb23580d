use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FIELD_LICENCE_NUMBER: &str = "licenceNumber";
pub const FIELD_LICENSEE: &str = "licensee";
pub const FIELD_STATUS: &str = "status";
pub const FIELD_EXPIRES: &str = "expires";

/// Column keys of the fixed display/export projection, in order.
pub const PROJECTED_FIELDS: [&str; 4] = [
    FIELD_LICENCE_NUMBER,
    FIELD_LICENSEE,
    FIELD_STATUS,
    FIELD_EXPIRES,
];

const DISPLAY_FALLBACK: &str = "N/A";

/// One licence's verification outcome as returned by the remote service.
///
/// Every key the service sent is retained, including ones the form never
/// shows. `licenceNumber` is the documented required key but is not enforced:
/// a record without it renders and exports with an empty licence number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationResult {
    fields: Map<String, Value>,
}

impl VerificationResult {
    /// Non-object array entries become empty records so the result count
    /// still matches what the service returned.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// String view of a field; `null` and missing keys are absent.
    pub fn field(&self, key: &str) -> Option<String> {
        self.fields.get(key).and_then(value_to_string)
    }

    pub fn licence_number(&self) -> Option<String> {
        self.field(FIELD_LICENCE_NUMBER)
    }

    /// Projection used by the export: the four fixed columns, missing values
    /// as empty strings.
    pub fn export_row(&self) -> [String; 4] {
        PROJECTED_FIELDS.map(|key| self.field(key).unwrap_or_default())
    }

    /// Projection used by the results table.
    pub fn display_row(&self) -> DisplayRow {
        DisplayRow {
            licence_number: self.licence_number().unwrap_or_default(),
            licensee: self.field(FIELD_LICENSEE).unwrap_or_default(),
            status: or_fallback(self.field(FIELD_STATUS)),
            expires: or_fallback(self.field(FIELD_EXPIRES)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub licence_number: String,
    pub licensee: String,
    pub status: String,
    pub expires: String,
}

/// Pulls the result records out of a decoded response body.
///
/// Accepts a bare array or an object carrying an array under `data`. Any
/// other shape yields an empty set rather than an error.
pub fn extract_results(body: Value) -> Vec<VerificationResult> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    items.into_iter().map(VerificationResult::from_value).collect()
}

fn or_fallback(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DISPLAY_FALLBACK.to_string())
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => serde_json::to_string(other).ok(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> VerificationResult {
        VerificationResult::from_value(value)
    }

    #[test]
    fn bare_array_is_used_in_order() {
        let results = extract_results(json!([
            {"licenceNumber": "B2"},
            {"licenceNumber": "A1"},
            {"licenceNumber": "B2"}
        ]));
        let numbers: Vec<_> = results
            .iter()
            .map(|r| r.licence_number().unwrap())
            .collect();
        assert_eq!(numbers, vec!["B2", "A1", "B2"]);
    }

    #[test]
    fn data_field_is_unwrapped() {
        let results = extract_results(json!({
            "data": [{"licenceNumber": "A1"}, {"licenceNumber": "A2"}],
            "total": 2
        }));
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].licence_number().as_deref(), Some("A2"));
    }

    #[test]
    fn unexpected_shapes_yield_empty_set() {
        assert!(extract_results(json!({"message": "ok"})).is_empty());
        assert!(extract_results(json!({"data": {"licenceNumber": "A1"}})).is_empty());
        assert!(extract_results(json!("done")).is_empty());
        assert!(extract_results(Value::Null).is_empty());
    }

    #[test]
    fn unknown_keys_are_retained() {
        let result = record(json!({
            "licenceNumber": "A1",
            "issuer": "State Board",
            "checkedAt": "2024-05-01T10:00:00Z"
        }));
        assert_eq!(result.fields().len(), 3);
        assert_eq!(result.field("issuer").as_deref(), Some("State Board"));
    }

    #[test]
    fn display_row_falls_back_for_status_and_expires_only() {
        let row = record(json!({"status": "", "expires": null})).display_row();
        assert_eq!(
            row,
            DisplayRow {
                licence_number: String::new(),
                licensee: String::new(),
                status: "N/A".to_string(),
                expires: "N/A".to_string(),
            }
        );
    }

    #[test]
    fn export_row_drops_extra_keys_and_defaults_to_empty() {
        let row = record(json!({
            "licenceNumber": "A1",
            "licensee": "Acme",
            "status": "active",
            "issuer": "ignored"
        }))
        .export_row();
        assert_eq!(row, ["A1", "Acme", "active", ""].map(String::from));
    }

    #[test]
    fn scalar_values_are_stringified() {
        let result = record(json!({"licenceNumber": 12345, "status": true}));
        assert_eq!(result.licence_number().as_deref(), Some("12345"));
        assert_eq!(result.field("status").as_deref(), Some("true"));
    }

    #[test]
    fn non_object_entries_become_empty_records() {
        let results = extract_results(json!([{"licenceNumber": "A1"}, 42]));
        assert_eq!(results.len(), 2);
        assert!(results[1].fields().is_empty());
    }

    #[test]
    fn serializes_back_to_the_original_object() {
        let source = json!({"licenceNumber": "A1", "extra": [1, 2]});
        let result = record(source.clone());
        assert_eq!(serde_json::to_value(&result).unwrap(), source);
    }
}
