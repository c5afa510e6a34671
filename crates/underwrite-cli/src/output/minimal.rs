use serde_json::Value;

use super::scalar;

/// Print just the key answer value from the output: the IRR where one
/// exists, one line per scenario for scenario analyses.
pub fn print_minimal(value: &Value) {
    let result = value.get("result").unwrap_or(value);

    if let Some(outcomes) = result.get("outcomes").and_then(Value::as_array) {
        for outcome in outcomes {
            let name = outcome.get("name").map(scalar).unwrap_or_default();
            match outcome.get("result").and_then(|r| r.get("irr")) {
                Some(irr) => println!("{}: {}", name, scalar(irr)),
                None => println!(
                    "{}: failed ({})",
                    name,
                    outcome.get("error").map(scalar).unwrap_or_default()
                ),
            }
        }
        return;
    }

    // Priority order for single-run output
    for key in ["irr", "cash_on_cash", "cap_rate", "noi"] {
        if let Some(val) = result.get(key) {
            if !val.is_null() {
                println!("{}", scalar(val));
                return;
            }
        }
    }

    if let Value::Object(map) = result {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar(val));
            return;
        }
    }

    println!("{}", scalar(result));
}
