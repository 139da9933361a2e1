use serde_json::Value;
use std::io;

/// Emit the first embedded schedule (periods, cash flows, rows, ...) as CSV.
/// Falls back to a two-column field/value listing of the scalar result.
pub fn print_csv(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(records) = find_records(result) {
        if write_records(records).is_err() {
            eprintln!("CSV write error");
        }
        return;
    }

    if let Value::Object(fields) = result {
        let mut writer = csv::Writer::from_writer(io::stdout());
        let _ = writer.write_record(["field", "value"]);
        for (key, val) in fields {
            if !matches!(val, Value::Array(_) | Value::Object(_)) {
                let _ = writer.write_record([key.as_str(), &render(val)]);
            }
        }
        let _ = writer.flush();
    }
}

/// First array-of-objects field inside the result, searching one level deep.
fn find_records(result: &Value) -> Option<&Vec<Value>> {
    let fields = result.as_object()?;
    fields.values().find_map(|v| match v {
        Value::Array(arr) if matches!(arr.first(), Some(Value::Object(_))) => Some(arr),
        _ => None,
    })
}

fn write_records(records: &[Value]) -> Result<(), csv::Error> {
    let headers: Vec<String> = match records.first() {
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        _ => return Ok(()),
    };

    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(&headers)?;
    for record in records {
        if let Value::Object(map) = record {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(render).unwrap_or_default())
                .collect();
            writer.write_record(&row)?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
