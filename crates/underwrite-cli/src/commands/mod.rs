pub mod returns;
pub mod scenarios;
pub mod underwrite;

use clap::Args;
use rust_decimal::Decimal;

use underwrite_core::assumptions::{AssumptionOverrides, Assumptions};
use underwrite_core::rent_roll::RentRoll;

use crate::input;

/// Assumption override flags shared by the underwrite and scenarios
/// commands. Flags win over the --assumptions file; anything unset takes
/// the engine defaults.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AssumptionFlags {
    /// Path to a JSON assumption override map (recognized keys only)
    #[arg(long)]
    pub assumptions: Option<String>,

    /// Annual rent growth rate (e.g. 0.03 for 3%)
    #[arg(long)]
    pub rent_growth: Option<Decimal>,

    /// Loan-to-value ratio (e.g. 0.70)
    #[arg(long)]
    pub ltv: Option<Decimal>,

    /// Annual interest rate on the interest-only loan
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Operating expense ratio applied to EGI
    #[arg(long)]
    pub expense_ratio: Option<Decimal>,

    /// Hold period in years
    #[arg(long)]
    pub hold_period: Option<u32>,

    /// Cap rate compression applied at exit
    #[arg(long)]
    pub exit_cap_compression: Option<Decimal>,
}

impl AssumptionFlags {
    pub fn resolve(&self) -> Result<Assumptions, Box<dyn std::error::Error>> {
        let mut overrides: AssumptionOverrides = match self.assumptions.as_deref() {
            Some(path) => input::file::read_json(path)?,
            None => AssumptionOverrides::default(),
        };

        if let Some(v) = self.rent_growth {
            overrides.rent_growth = Some(v);
        }
        if let Some(v) = self.ltv {
            overrides.ltv = Some(v);
        }
        if let Some(v) = self.interest_rate {
            overrides.interest_rate = Some(v);
        }
        if let Some(v) = self.expense_ratio {
            overrides.expense_ratio = Some(v);
        }
        if let Some(v) = self.hold_period {
            overrides.hold_period = Some(v);
        }
        if let Some(v) = self.exit_cap_compression {
            overrides.exit_cap_compression = Some(v);
        }

        Ok(Assumptions::with_overrides(&overrides))
    }
}

/// Load the rent roll from --input, or from piped stdin.
pub fn read_rent_roll(path: Option<&str>) -> Result<RentRoll, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return input::file::read_json(path);
    }
    if let Some(rent_roll) = input::stdin::read_rent_roll()? {
        return Ok(rent_roll);
    }
    Err("--input file is required (or pipe rent roll JSON on stdin)".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use std::fs;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("uwr-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    fn flags() -> AssumptionFlags {
        AssumptionFlags {
            assumptions: None,
            rent_growth: None,
            ltv: None,
            interest_rate: None,
            expense_ratio: None,
            hold_period: None,
            exit_cap_compression: None,
        }
    }

    #[test]
    fn test_no_flags_resolve_to_defaults() {
        assert_eq!(flags().resolve().unwrap(), Assumptions::default());
    }

    #[test]
    fn test_individual_flags_override_defaults() {
        let mut f = flags();
        f.ltv = Some(dec!(0.60));
        f.hold_period = Some(7);
        let a = f.resolve().unwrap();
        assert_eq!(a.ltv, dec!(0.60));
        assert_eq!(a.hold_period, 7);
        assert_eq!(a.rent_growth, Assumptions::default().rent_growth);
    }

    #[test]
    fn test_flags_win_over_assumptions_file() {
        let path = write_temp(
            "overrides.json",
            r#"{ "rent_growth": "0.05", "ltv": "0.80" }"#,
        );
        let mut f = flags();
        f.assumptions = Some(path.to_string_lossy().into_owned());
        f.rent_growth = Some(dec!(0.02));
        let a = f.resolve().unwrap();
        fs::remove_file(&path).ok();

        // The flag beats the file; the file still beats the default
        assert_eq!(a.rent_growth, dec!(0.02));
        assert_eq!(a.ltv, dec!(0.80));
        assert_eq!(a.hold_period, Assumptions::default().hold_period);
    }

    #[test]
    fn test_unrecognized_file_key_is_an_error() {
        let path = write_temp("bad-overrides.json", r#"{ "cap_rate": "0.06" }"#);
        let mut f = flags();
        f.assumptions = Some(path.to_string_lossy().into_owned());
        let result = f.resolve();
        fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn test_read_rent_roll_from_file() {
        let path = write_temp(
            "roll.json",
            r#"{
                "property_name": "Maple Court",
                "address": "400 Maple Ct, Columbus OH",
                "purchase_price": "1000000",
                "total_units": 2,
                "units": [
                    { "unit_id": "101", "monthly_rent": "1000", "occupied": true },
                    { "unit_id": "102", "monthly_rent": "950", "occupied": false }
                ]
            }"#,
        );
        let roll = read_rent_roll(Some(path.to_str().unwrap())).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(roll.total_units, 2);
        assert_eq!(roll.units.len(), 2);
        assert_eq!(roll.units[0].monthly_rent, dec!(1000));
    }

    #[test]
    fn test_read_rent_roll_missing_file_is_an_error() {
        let result = read_rent_roll(Some("/nonexistent/roll.json"));
        assert!(result.unwrap_err().to_string().contains("File not found"));
    }
}
