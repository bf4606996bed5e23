use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Object results surface the headline metric (total revenue, then the
/// delinquent AR bucket, then client profit); list results print one line
/// per record keyed by its name.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            let priority_keys = ["total_revenue", "90+", "profit", "revenue"];
            for key in &priority_keys {
                if let Some(val) = map.get(*key) {
                    if !val.is_null() {
                        println!("{}", format_minimal(val));
                        return;
                    }
                }
            }
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_minimal(val));
            }
        }
        Value::Array(arr) => {
            for item in arr {
                let Value::Object(map) = item else {
                    println!("{}", format_minimal(item));
                    continue;
                };
                let label = map
                    .get("client_name")
                    .or_else(|| map.get("month"))
                    .map(format_minimal)
                    .unwrap_or_default();
                let answer = map
                    .get("segment")
                    .or_else(|| map.get("revenue"))
                    .map(format_minimal)
                    .unwrap_or_default();
                println!("{}: {}", label, answer);
            }
        }
        other => println!("{}", format_minimal(other)),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
