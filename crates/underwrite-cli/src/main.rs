mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::returns::IrrArgs;
use commands::scenarios::ScenariosArgs;
use commands::underwrite::UnderwriteArgs;

/// Multifamily rent roll underwriting
#[derive(Parser)]
#[command(
    name = "uwr",
    version,
    about = "Underwrite a multifamily property from a normalized rent roll",
    long_about = "Runs the deterministic underwriting chain (gross rent, EGI, NOI, \
                  cap rate, interest-only debt service, cash-on-cash, hold-period \
                  projection, exit valuation, IRR) plus bull/base/bear scenario \
                  analysis, all with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full underwriting chain on a rent roll
    Underwrite(UnderwriteArgs),
    /// Run bull/base/bear scenario projections
    Scenarios(ScenariosArgs),
    /// Solve the IRR of an arbitrary cash-flow series
    Irr(IrrArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Underwrite(args) => commands::underwrite::run(args),
        Commands::Scenarios(args) => commands::scenarios::run(args),
        Commands::Irr(args) => commands::returns::run(args),
        Commands::Version => {
            println!("uwr {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
