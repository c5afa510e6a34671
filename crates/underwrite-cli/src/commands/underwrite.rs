use clap::Args;
use serde_json::Value;

use underwrite_core::underwrite;

use super::{read_rent_roll, AssumptionFlags};

/// Arguments for the underwrite command
#[derive(Args)]
pub struct UnderwriteArgs {
    /// Path to the normalized rent roll JSON (reads piped stdin if omitted)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub assumptions: AssumptionFlags,
}

pub fn run(args: UnderwriteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rent_roll = read_rent_roll(args.input.as_deref())?;
    let assumptions = args.assumptions.resolve()?;

    let result = underwrite::underwrite(&rent_roll, &assumptions)?;
    Ok(serde_json::to_value(result)?)
}
