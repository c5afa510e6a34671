use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::scalar;

/// Format output as tables. Understands the engine's envelope: single
/// underwrite runs get metrics and projection sections, scenario analyses
/// get one row per scenario.
pub fn print_table(value: &Value) {
    let result = value.get("result").unwrap_or(value);

    if let Some(outcomes) = result.get("outcomes").and_then(Value::as_array) {
        print_scenario_table(outcomes);
    } else if result.get("metrics").is_some() {
        print_underwrite_tables(result);
    } else {
        print_field_table(result);
    }

    print_envelope_footer(value);
}

fn print_underwrite_tables(result: &Value) {
    if let Some(metrics) = result.get("metrics") {
        println!("Metrics");
        print_field_table(metrics);
    }

    if let Some(projection) = result.get("projection") {
        println!("\nProjection");
        print_projection_table(projection);
    }

    if let Some(irr) = result.get("irr") {
        println!("\nIRR: {}", scalar(irr));
    }
}

fn print_projection_table(projection: &Value) {
    let noi = projection.get("noi_by_year").and_then(Value::as_array);
    let cash = projection.get("cash_flow_by_year").and_then(Value::as_array);

    if let (Some(noi), Some(cash)) = (noi, cash) {
        let mut builder = Builder::default();
        builder.push_record(["Year", "NOI", "Cash Flow"]);
        for (i, (n, c)) in noi.iter().zip(cash.iter()).enumerate() {
            builder.push_record([(i + 1).to_string(), scalar(n), scalar(c)]);
        }
        println!("{}", Table::from(builder));
    }

    for key in ["exit_cap_rate", "exit_value", "loan_payoff", "exit_proceeds"] {
        if let Some(v) = projection.get(key) {
            println!("{}: {}", key, scalar(v));
        }
    }
}

fn print_scenario_table(outcomes: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record([
        "Scenario",
        "Status",
        "IRR",
        "NOI",
        "Cap Rate",
        "Cash-on-Cash",
        "Exit Value",
    ]);

    for outcome in outcomes {
        let name = outcome.get("name").map(scalar).unwrap_or_default();
        let status = outcome.get("status").map(scalar).unwrap_or_default();

        match outcome.get("result") {
            Some(result) => {
                let metrics = &result["metrics"];
                builder.push_record([
                    name,
                    status,
                    result.get("irr").map(scalar).unwrap_or_default(),
                    metrics.get("noi").map(scalar).unwrap_or_default(),
                    metrics.get("cap_rate").map(scalar).unwrap_or_default(),
                    metrics.get("cash_on_cash").map(scalar).unwrap_or_default(),
                    result["projection"]
                        .get("exit_value")
                        .map(scalar)
                        .unwrap_or_default(),
                ]);
            }
            None => {
                let error = outcome.get("error").map(scalar).unwrap_or_default();
                builder.push_record([
                    name,
                    status,
                    error,
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                ]);
            }
        }
    }

    println!("{}", Table::from(builder));
}

fn print_field_table(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.clone(), scalar(val)]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{}", scalar(value));
    }
}

fn print_envelope_footer(value: &Value) {
    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
