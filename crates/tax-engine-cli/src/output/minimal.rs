use serde_json::Value;

use super::format_scalar;

/// Headline figure per command, in priority order.
const PRIORITY_KEYS: [&str; 6] = [
    "total",
    "net_salary",
    "vat_payable",
    "annual_charge",
    "total_depreciation",
    "jurisdiction",
];

/// Print just the headline answer from the output.
///
/// Nested totals (invoice `taxes`, payroll-run `totals`) are searched after
/// the top-level fields. A VAT return in credit prints the credit instead.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(Value::String(position)) = result.get("position") {
        if position == "CREDIT" {
            if let Some(credit) = result.get("vat_credit") {
                println!("credit {}", format_scalar(credit));
                return;
            }
        }
    }

    let nested = ["taxes", "totals"]
        .iter()
        .filter_map(|k| result.get(*k))
        .collect::<Vec<_>>();

    for candidate in std::iter::once(result).chain(nested) {
        if let Value::Object(map) = candidate {
            for key in &PRIORITY_KEYS {
                if let Some(val) = map.get(*key) {
                    if !val.is_null() {
                        println!("{}", format_scalar(val));
                        return;
                    }
                }
            }
        }
    }

    match result {
        Value::Object(map) => match map.iter().next() {
            Some((key, val)) => println!("{}: {}", key, format_scalar(val)),
            None => println!("{{}}"),
        },
        other => println!("{}", format_scalar(other)),
    }
}
