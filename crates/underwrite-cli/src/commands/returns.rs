use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use underwrite_core::time_value;

/// Arguments for the irr command
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct IrrArgs {
    /// Comma-separated cash-flow series, year 0 first
    /// (e.g. "-300000,43420,45000,47000,49000,850000")
    #[arg(long)]
    pub cash_flows: String,
}

pub fn run(args: IrrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let flows = parse_cash_flows(&args.cash_flows)?;
    let irr = time_value::irr(&flows)?;

    Ok(serde_json::json!({
        "irr": irr.to_string(),
        "periods": flows.len() - 1,
    }))
}

fn parse_cash_flows(raw: &str) -> Result<Vec<Decimal>, Box<dyn std::error::Error>> {
    let flows = raw
        .split(',')
        .map(|s| s.trim().parse::<Decimal>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Failed to parse cash flows '{raw}': {e}"))?;
    Ok(flows)
}
