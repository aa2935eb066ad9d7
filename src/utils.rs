use serde_json::Value;

/// Slot values count as empty when absent, null, or a blank string.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Accepts JSON integers and strings holding an integer ("42", " 7 ").
pub fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub fn positive_id(value: &Value) -> Option<u32> {
    integer_value(value)
        .filter(|n| *n >= 1)
        .and_then(|n| u32::try_from(n).ok())
}

/// "Property title modified" / "Properties title,releaseDate modified".
pub fn describe_changes(changed: &[&str]) -> String {
    let ending = if changed.len() > 1 { "ies" } else { "y" };
    format!("Propert{} {}", ending, changed.join(","))
}
