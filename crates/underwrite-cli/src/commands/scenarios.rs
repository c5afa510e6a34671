use clap::Args;
use serde_json::Value;

use underwrite_core::scenario;

use super::{read_rent_roll, AssumptionFlags};

/// Arguments for the scenarios command
#[derive(Args)]
pub struct ScenariosArgs {
    /// Path to the normalized rent roll JSON (reads piped stdin if omitted)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub assumptions: AssumptionFlags,
}

pub fn run(args: ScenariosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rent_roll = read_rent_roll(args.input.as_deref())?;
    let base = args.assumptions.resolve()?;

    let result = scenario::run_scenarios(&rent_roll, &base)?;
    Ok(serde_json::to_value(result)?)
}
