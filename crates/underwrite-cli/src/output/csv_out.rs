use serde_json::Value;
use std::io;

use super::scalar;

/// Write output as CSV to stdout: one row per scenario for scenario
/// analyses, flattened field/value rows otherwise.
pub fn print_csv(value: &Value) {
    let result = value.get("result").unwrap_or(value);

    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some(outcomes) = result.get("outcomes").and_then(Value::as_array) {
        write_scenario_csv(&mut wtr, outcomes);
    } else {
        let _ = wtr.write_record(["field", "value"]);
        let mut rows = Vec::new();
        flatten("", result, &mut rows);
        for (field, val) in rows {
            let _ = wtr.write_record([field.as_str(), val.as_str()]);
        }
    }

    let _ = wtr.flush();
}

fn write_scenario_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, outcomes: &[Value]) {
    let _ = wtr.write_record([
        "scenario",
        "status",
        "irr",
        "noi",
        "cap_rate",
        "cash_on_cash",
        "exit_value",
        "error",
    ]);

    for outcome in outcomes {
        let name = outcome.get("name").map(scalar).unwrap_or_default();
        let status = outcome.get("status").map(scalar).unwrap_or_default();
        let error = outcome.get("error").map(scalar).unwrap_or_default();

        let (irr, noi, cap_rate, coc, exit_value) = match outcome.get("result") {
            Some(result) => {
                let metrics = &result["metrics"];
                (
                    result.get("irr").map(scalar).unwrap_or_default(),
                    metrics.get("noi").map(scalar).unwrap_or_default(),
                    metrics.get("cap_rate").map(scalar).unwrap_or_default(),
                    metrics.get("cash_on_cash").map(scalar).unwrap_or_default(),
                    result["projection"]
                        .get("exit_value")
                        .map(scalar)
                        .unwrap_or_default(),
                )
            }
            None => Default::default(),
        };

        let _ = wtr.write_record([name, status, irr, noi, cap_rate, coc, exit_value, error]);
    }
}

/// Flatten nested objects into dotted field paths; arrays join into a
/// single semicolon-separated cell.
fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, val, rows);
            }
        }
        Value::Array(arr) => {
            let joined = arr.iter().map(scalar).collect::<Vec<_>>().join("; ");
            rows.push((prefix.to_string(), joined));
        }
        other => rows.push((prefix.to_string(), scalar(other))),
    }
}
