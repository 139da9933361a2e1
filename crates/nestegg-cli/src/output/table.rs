use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Render the computation envelope as tables: scalar result fields first,
/// then one table per embedded schedule (periods, cash flows, rows, ...).
pub fn print_table(value: &Value) {
    let envelope = match value.as_object() {
        Some(map) => map,
        None => {
            println!("{}", value);
            return;
        }
    };

    let result = envelope.get("result").unwrap_or(value);

    match result {
        Value::Object(fields) => {
            print_scalars(fields);
            for (key, val) in fields {
                match val {
                    Value::Array(arr) if !arr.is_empty() => {
                        println!("\n{key}:");
                        print_records(arr);
                    }
                    Value::Object(nested) => {
                        println!("\n{key}:");
                        print_scalars(nested);
                    }
                    _ => {}
                }
            }
        }
        Value::Array(arr) => print_records(arr),
        other => println!("{}", other),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}

/// Field/Value table over the scalar members of an object.
fn print_scalars(fields: &serde_json::Map<String, Value>) {
    let scalars: Vec<(&String, &Value)> = fields
        .iter()
        .filter(|(_, v)| !matches!(v, Value::Array(_) | Value::Object(_)))
        .collect();
    if scalars.is_empty() {
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in scalars {
        builder.push_record([key.as_str(), &render(val)]);
    }
    println!("{}", Table::from(builder));
}

/// One table over an array of uniform objects, headers from the first entry.
fn print_records(arr: &[Value]) {
    let first = match arr.first() {
        Some(Value::Object(map)) => map,
        _ => {
            for item in arr {
                println!("{}", render(item));
            }
            return;
        }
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(render).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }

    println!("{}", Table::from(builder));
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => arr.iter().map(render).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
