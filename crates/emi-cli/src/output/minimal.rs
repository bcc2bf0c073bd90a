use serde_json::Value;

use super::cell;

/// Key answers, in priority order, for each command's result.
const PRIORITY_KEYS: [&str; 4] = ["emi_amount", "interest_difference", "valid", "total_payment"];

/// Print just the key answer value from the output.
///
/// Objects print the first priority key present; schedules print one line
/// per month with the month number and remaining balance.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            for key in PRIORITY_KEYS {
                if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                    println!("{}", cell(val));
                    return;
                }
            }
            if let Some((key, val)) = map.iter().next() {
                println!("{key}: {}", cell(val));
            }
        }
        Value::Array(rows) => {
            for row in rows {
                let period = row.get("month").or_else(|| row.get("year"));
                let balance = row
                    .get("remaining_balance")
                    .or_else(|| row.get("closing_balance"));
                match (period, balance) {
                    (Some(p), Some(b)) => println!("{}\t{}", cell(p), cell(b)),
                    _ => println!("{}", cell(row)),
                }
            }
        }
        other => println!("{}", cell(other)),
    }
}
