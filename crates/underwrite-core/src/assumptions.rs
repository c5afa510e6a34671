use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::UnderwriteError;
use crate::types::Rate;
use crate::UnderwriteResult;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Documented default assumption set. Referenced only where a fresh
/// `Assumptions` value is constructed; never mutated.
pub const DEFAULT_RENT_GROWTH: Rate = dec!(0.03);
pub const DEFAULT_LTV: Rate = dec!(0.70);
pub const DEFAULT_INTEREST_RATE: Rate = dec!(0.065);
pub const DEFAULT_EXPENSE_RATIO: Rate = dec!(0.35);
pub const DEFAULT_HOLD_PERIOD: u32 = 5;
pub const DEFAULT_EXIT_CAP_COMPRESSION: Rate = dec!(0.02);

/// Upper bound on the hold period; keeps decimal compounding well inside
/// the 96-bit mantissa.
const MAX_HOLD_PERIOD: u32 = 50;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Underwriting assumptions for a single analysis. A value object: each
/// scenario constructs its own copy with overrides applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    /// Annual rent growth compounded into projected NOI
    pub rent_growth: Rate,
    /// Loan-to-value ratio, in [0, 1]
    pub ltv: Rate,
    /// Annual interest rate on the interest-only loan
    pub interest_rate: Rate,
    /// Operating expense ratio applied to effective gross income
    pub expense_ratio: Rate,
    /// Hold period in years
    pub hold_period: u32,
    /// Cap rate compression applied at exit
    pub exit_cap_compression: Rate,
}

impl Default for Assumptions {
    fn default() -> Self {
        Assumptions {
            rent_growth: DEFAULT_RENT_GROWTH,
            ltv: DEFAULT_LTV,
            interest_rate: DEFAULT_INTEREST_RATE,
            expense_ratio: DEFAULT_EXPENSE_RATIO,
            hold_period: DEFAULT_HOLD_PERIOD,
            exit_cap_compression: DEFAULT_EXIT_CAP_COMPRESSION,
        }
    }
}

/// Override map accepted at the engine boundary. Unrecognized keys are
/// rejected at deserialization; missing keys take the documented defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssumptionOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_growth: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ltv: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_ratio: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_period: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_cap_compression: Option<Rate>,
}

impl Assumptions {
    /// Build a fresh assumption set from the defaults with `overrides`
    /// applied on top.
    pub fn with_overrides(overrides: &AssumptionOverrides) -> Self {
        let base = Assumptions::default();
        Assumptions {
            rent_growth: overrides.rent_growth.unwrap_or(base.rent_growth),
            ltv: overrides.ltv.unwrap_or(base.ltv),
            interest_rate: overrides.interest_rate.unwrap_or(base.interest_rate),
            expense_ratio: overrides.expense_ratio.unwrap_or(base.expense_ratio),
            hold_period: overrides.hold_period.unwrap_or(base.hold_period),
            exit_cap_compression: overrides
                .exit_cap_compression
                .unwrap_or(base.exit_cap_compression),
        }
    }

    pub fn validate(&self) -> UnderwriteResult<()> {
        if self.ltv < Decimal::ZERO || self.ltv > Decimal::ONE {
            return Err(UnderwriteError::InvalidInput {
                field: "ltv".into(),
                reason: "LTV must be between 0 and 1".into(),
            });
        }

        if self.interest_rate < Decimal::ZERO {
            return Err(UnderwriteError::InvalidInput {
                field: "interest_rate".into(),
                reason: "Interest rate must be non-negative".into(),
            });
        }

        if self.expense_ratio < Decimal::ZERO || self.expense_ratio > Decimal::ONE {
            return Err(UnderwriteError::InvalidInput {
                field: "expense_ratio".into(),
                reason: "Expense ratio must be between 0 and 1".into(),
            });
        }

        if self.hold_period == 0 || self.hold_period > MAX_HOLD_PERIOD {
            return Err(UnderwriteError::InvalidInput {
                field: "hold_period".into(),
                reason: format!("Hold period must be between 1 and {MAX_HOLD_PERIOD} years"),
            });
        }

        if self.rent_growth <= dec!(-1) {
            return Err(UnderwriteError::InvalidInput {
                field: "rent_growth".into(),
                reason: "Rent growth must be greater than -100%".into(),
            });
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
