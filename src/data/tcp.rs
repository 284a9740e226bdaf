//! Flattening of the free-form TCP status block into key/value rows.

use serde_json::Value;

/// Flatten nested JSON into `(path, value)` rows.
///
/// Object keys are joined with `.` and array items are addressed by index,
/// so `{"listeners": [{"port": 80}]}` becomes `("listeners.0.port", "80")`.
/// A bare scalar at the top level is reported under the empty path.
pub fn flatten(value: &Value) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    flatten_into(value, String::new(), &mut rows);
    rows
}

fn flatten_into(value: &Value, path: String, rows: &mut Vec<(String, String)>) {
    let join = |key: &str| {
        if path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", path, key)
        }
    };

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(child, join(key), rows);
            }
        }
        Value::Array(items) => {
            if items.is_empty() {
                rows.push((path.clone(), "[]".to_string()));
            }
            for (i, child) in items.iter().enumerate() {
                flatten_into(child, join(&i.to_string()), rows);
            }
        }
        Value::String(s) => rows.push((path, s.clone())),
        Value::Null => rows.push((path, "-".to_string())),
        other => rows.push((path, other.to_string())),
    }
}
