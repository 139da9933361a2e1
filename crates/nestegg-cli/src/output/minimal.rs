use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Heuristic: look in the result (or its summary) for well-known fields in
/// order of priority, then fall back to the first scalar field.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Summaries hold the headline figures when present.
    let target = result
        .as_object()
        .and_then(|m| m.get("summary"))
        .unwrap_or(result);

    let priority_keys = [
        "final_capital",
        "present_value_total",
        "net_periodic_payment",
        "col_adjusted_monthly_payment",
        "monthly_payment",
        "mean_final_capital",
    ];

    if let Value::Object(map) = target {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", render(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map
            .iter()
            .find(|(_, v)| !matches!(v, Value::Array(_) | Value::Object(_)))
        {
            println!("{}: {}", key, render(val));
            return;
        }
    }

    println!("{}", render(target));
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
