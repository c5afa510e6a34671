use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assumptions::Assumptions;
use crate::metrics::FinancialMetrics;
use crate::projection::Projection;
use crate::rent_roll::{self, RentRoll};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::underwrite::run_chain;
use crate::UnderwriteResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The closed scenario set. The override table is exhaustive over these
/// three names; there is no fourth scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioName {
    Bull,
    Base,
    Bear,
}

impl ScenarioName {
    /// Presentation order, fixed regardless of computation order.
    pub const ALL: [ScenarioName; 3] = [ScenarioName::Bull, ScenarioName::Base, ScenarioName::Bear];

    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioName::Bull => "bull",
            ScenarioName::Base => "base",
            ScenarioName::Bear => "bear",
        }
    }

    fn overrides(self) -> ScenarioOverrides {
        match self {
            ScenarioName::Bull => ScenarioOverrides {
                rent_growth: dec!(0.04),
                exit_cap_compression: dec!(0.03),
                vacancy_adjustment: dec!(-0.02),
            },
            ScenarioName::Base => ScenarioOverrides {
                rent_growth: dec!(0.03),
                exit_cap_compression: dec!(0.02),
                vacancy_adjustment: Decimal::ZERO,
            },
            ScenarioName::Bear => ScenarioOverrides {
                rent_growth: dec!(0.01),
                exit_cap_compression: Decimal::ZERO,
                vacancy_adjustment: dec!(0.05),
            },
        }
    }
}

impl std::fmt::Display for ScenarioName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-scenario parameter overrides applied on top of the base assumptions.
#[derive(Debug, Clone, Copy)]
struct ScenarioOverrides {
    rent_growth: Rate,
    exit_cap_compression: Rate,
    vacancy_adjustment: Rate,
}

/// A completed scenario run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: ScenarioName,
    pub assumptions_used: Assumptions,
    /// Vacancy rate after the scenario adjustment, clamped to [0, 1]
    pub vacancy_rate: Rate,
    pub metrics: FinancialMetrics,
    pub projection: Projection,
    pub equity_cash_flows: Vec<Money>,
    pub irr: Rate,
}

/// Completion or isolated failure of one scenario. One scenario failing
/// (e.g. an impossible exit cap under bull compression) never aborts the
/// other two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScenarioRun {
    Completed { result: ScenarioResult },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub name: ScenarioName,
    #[serde(flatten)]
    pub run: ScenarioRun,
}

impl ScenarioOutcome {
    pub fn result(&self) -> Option<&ScenarioResult> {
        match &self.run {
            ScenarioRun::Completed { result } => Some(result),
            ScenarioRun::Failed { .. } => None,
        }
    }
}

/// Scenario analysis across the fixed bull/base/bear override table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAnalysis {
    /// Always in bull, base, bear order
    pub outcomes: Vec<ScenarioOutcome>,
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Run the full underwriting chain once per scenario, each with its own
/// override copy of the base assumptions and an adjusted vacancy rate. The
/// scenarios share no mutable state.
pub fn run_scenarios(
    rent_roll: &RentRoll,
    base: &Assumptions,
) -> UnderwriteResult<ComputationOutput<ScenarioAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    base.validate()?;
    let summary = rent_roll::aggregate_units(rent_roll, &mut warnings)?;

    let mut outcomes = Vec::with_capacity(ScenarioName::ALL.len());
    for name in ScenarioName::ALL {
        let ov = name.overrides();
        let assumptions = Assumptions {
            rent_growth: ov.rent_growth,
            exit_cap_compression: ov.exit_cap_compression,
            ..base.clone()
        };
        let vacancy_rate = clamp_unit_interval(summary.vacancy_rate + ov.vacancy_adjustment);

        let run = match run_chain(&summary, rent_roll.purchase_price, vacancy_rate, &assumptions)
        {
            Ok((metrics, projection, equity_cash_flows, irr)) => ScenarioRun::Completed {
                result: ScenarioResult {
                    name,
                    assumptions_used: assumptions,
                    vacancy_rate,
                    metrics,
                    projection,
                    equity_cash_flows,
                    irr,
                },
            },
            Err(e) => ScenarioRun::Failed {
                error: e.to_string(),
            },
        };
        outcomes.push(ScenarioOutcome { name, run });
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Bull/Base/Bear Scenario Analysis",
        base,
        warnings,
        elapsed,
        ScenarioAnalysis { outcomes },
    ))
}

/// Vacancy cannot go negative or exceed 1.
fn clamp_unit_interval(rate: Rate) -> Rate {
    rate.max(Decimal::ZERO).min(Decimal::ONE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
