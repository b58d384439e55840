use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{format_scalar, ROW_FIELDS};

/// Format output as tables: scalar result fields first, then one table per
/// row-shaped field, then warnings and methodology.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result(result, map),
            _ => print_fields(map),
        },
        Value::Array(arr) => print_rows(arr),
        other => println!("{}", other),
    }
}

fn print_result(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    let mut scalars = Map::new();
    for (key, val) in result {
        match val {
            Value::Object(inner) => {
                for (inner_key, inner_val) in inner {
                    scalars.insert(format!("{key}.{inner_key}"), inner_val.clone());
                }
            }
            Value::Array(_) if ROW_FIELDS.contains(&key.as_str()) => {}
            _ => {
                scalars.insert(key.clone(), val.clone());
            }
        }
    }
    print_fields(&scalars);

    for key in ROW_FIELDS {
        if let Some(Value::Array(rows)) = result.get(key) {
            if !rows.is_empty() {
                println!("\n{}:", key);
                print_rows(rows);
            }
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.clone(), format_cell(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            println!("{}", format_cell(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_cell).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr.iter().map(format_cell).collect::<Vec<_>>().join(", "),
        other => format_scalar(other),
    }
}
