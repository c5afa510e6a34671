use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::error::UnderwriteError;
use crate::metrics::FinancialMetrics;
use crate::types::{Money, Rate};
use crate::UnderwriteResult;

/// Hold-period projection with exit valuation. Built once per scenario;
/// immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Projected NOI for years 1..=hold_period
    pub noi_by_year: Vec<Money>,
    /// After-debt cash flow for the same years
    pub cash_flow_by_year: Vec<Money>,
    pub exit_cap_rate: Rate,
    pub exit_value: Money,
    pub loan_payoff: Money,
    pub exit_proceeds: Money,
}

/// Compound base-year NOI through the hold period and value the exit.
///
/// Rent growth compounds directly into NOI; operating expenses are not
/// re-inflated separately, so the effective expense ratio declines in real
/// terms over the hold. That asymmetry is part of the documented model, not
/// something this builder corrects for. Debt service is constant
/// (interest-only loan), and the exit payoff is the original loan amount.
pub fn build_projection(
    metrics: &FinancialMetrics,
    assumptions: &Assumptions,
) -> UnderwriteResult<Projection> {
    let years = assumptions.hold_period as usize;
    let growth = Decimal::ONE + assumptions.rent_growth;

    let mut noi_by_year = Vec::with_capacity(years);
    let mut cash_flow_by_year = Vec::with_capacity(years);
    let mut projected_noi = metrics.noi;
    for _ in 0..years {
        projected_noi *= growth;
        noi_by_year.push(projected_noi);
        cash_flow_by_year.push(projected_noi - metrics.debt_service);
    }

    let exit_cap_rate = metrics.cap_rate - assumptions.exit_cap_compression;
    if exit_cap_rate <= Decimal::ZERO {
        // Never clamped: a non-positive exit cap implies an undefined or
        // negative valuation and must be surfaced to the caller.
        return Err(UnderwriteError::ImpossibleValuation(format!(
            "Exit cap rate {} (going-in {} less {} compression) is not positive; exit value is undefined",
            exit_cap_rate, metrics.cap_rate, assumptions.exit_cap_compression
        )));
    }

    let exit_value = projected_noi / exit_cap_rate;
    let loan_payoff = metrics.loan_amount;
    let exit_proceeds = exit_value - loan_payoff;

    Ok(Projection {
        noi_by_year,
        cash_flow_by_year,
        exit_cap_rate,
        exit_value,
        loan_payoff,
        exit_proceeds,
    })
}

/// Equity cash-flow series for the IRR solve: year 0 is the equity outflow,
/// each hold year contributes its after-debt cash flow, and the final year
/// adds net exit proceeds.
pub fn equity_cash_flows(metrics: &FinancialMetrics, projection: &Projection) -> Vec<Money> {
    let mut flows = Vec::with_capacity(projection.cash_flow_by_year.len() + 1);
    flows.push(-metrics.equity);
    flows.extend_from_slice(&projection.cash_flow_by_year);
    if flows.len() > 1 {
        if let Some(last) = flows.last_mut() {
            *last += projection.exit_proceeds;
        }
    }
    flows
}
