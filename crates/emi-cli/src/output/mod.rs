pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten nested objects into `parent.child` rows, in key order.
pub(crate) fn flatten_fields(map: &Map<String, Value>) -> Vec<(String, &Value)> {
    let mut rows = Vec::new();
    for (key, val) in map {
        match val {
            Value::Object(inner) => {
                for (sub_key, sub_val) in flatten_fields(inner) {
                    rows.push((format!("{key}.{sub_key}"), sub_val));
                }
            }
            _ => rows.push((key.clone(), val)),
        }
    }
    rows
}

/// Render a scalar for a text cell.
pub(crate) fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(cell).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_summary() {
        let value = json!({
            "emi_amount": "415.30",
            "composition": { "interest_pct": "9.71", "principal_pct": "90.29" }
        });
        let rows = flatten_fields(value.as_object().unwrap());
        let mut keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["composition.interest_pct", "composition.principal_pct", "emi_amount"]
        );
    }

    #[test]
    fn test_cell_rendering() {
        assert_eq!(cell(&json!("415.30")), "415.30");
        assert_eq!(cell(&json!(24)), "24");
        assert_eq!(cell(&json!(null)), "");
        assert_eq!(cell(&json!(["a", "b"])), "a, b");
    }
}
