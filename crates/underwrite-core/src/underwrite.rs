use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assumptions::Assumptions;
use crate::metrics::{self, FinancialMetrics};
use crate::projection::{self, Projection};
use crate::rent_roll::{self, RentRoll, RentRollSummary};
use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::UnderwriteResult;

/// Complete single-run underwriting output: the structured data handed to
/// the memo generator and knowledge graph collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwriteOutput {
    pub summary: RentRollSummary,
    pub metrics: FinancialMetrics,
    pub projection: Projection,
    /// Year 0..=hold_period equity series handed to the IRR solve
    pub equity_cash_flows: Vec<Money>,
    pub irr: Rate,
}

/// Run the full underwriting chain once: aggregate → metrics → projection →
/// IRR. Pure: calling twice with identical inputs yields identical results.
pub fn underwrite(
    rent_roll: &RentRoll,
    assumptions: &Assumptions,
) -> UnderwriteResult<ComputationOutput<UnderwriteOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    assumptions.validate()?;
    let summary = rent_roll::aggregate_units(rent_roll, &mut warnings)?;

    let (metrics, projection, equity_cash_flows, irr) = run_chain(
        &summary,
        rent_roll.purchase_price,
        summary.vacancy_rate,
        assumptions,
    )?;

    collect_warnings(&metrics, summary.vacancy_rate, assumptions, &mut warnings);

    let output = UnderwriteOutput {
        summary,
        metrics,
        projection,
        equity_cash_flows,
        irr,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Multifamily Underwriting (Income Approach, Interest-Only Debt)",
        assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// The deterministic calculation chain shared by single runs and scenario
/// runs. The vacancy rate is passed explicitly so scenario overrides can
/// adjust it without touching the rent roll.
pub(crate) fn run_chain(
    summary: &RentRollSummary,
    purchase_price: Money,
    vacancy_rate: Rate,
    assumptions: &Assumptions,
) -> UnderwriteResult<(FinancialMetrics, Projection, Vec<Money>, Rate)> {
    let metrics = metrics::calculate_metrics(
        summary.gross_annual_rent,
        vacancy_rate,
        purchase_price,
        assumptions,
    )?;
    let projection = projection::build_projection(&metrics, assumptions)?;
    let equity_cash_flows = projection::equity_cash_flows(&metrics, &projection);
    let irr = time_value::irr(&equity_cash_flows)?;
    Ok((metrics, projection, equity_cash_flows, irr))
}

/// Sanity flags on the computed figures. Warnings never alter a number.
fn collect_warnings(
    metrics: &FinancialMetrics,
    vacancy_rate: Rate,
    assumptions: &Assumptions,
    warnings: &mut Vec<String>,
) {
    if vacancy_rate > dec!(0.15) {
        warnings.push(format!(
            "Vacancy rate {:.1}% exceeds 15% — above typical market norms",
            vacancy_rate * dec!(100)
        ));
    }

    if metrics.cap_rate < dec!(0.03) {
        warnings.push(format!(
            "Cap rate {} is below 3% — unusually low, verify purchase price and rents",
            metrics.cap_rate
        ));
    } else if metrics.cap_rate > dec!(0.12) {
        warnings.push(format!(
            "Cap rate {} exceeds 12% — unusually high, may indicate elevated risk",
            metrics.cap_rate
        ));
    }

    if assumptions.ltv > dec!(0.80) {
        warnings.push(format!(
            "LTV of {:.1}% exceeds 80% — high leverage",
            assumptions.ltv * dec!(100)
        ));
    }

    if let Some(dscr) = metrics.dscr {
        if dscr < dec!(1.2) {
            warnings.push(format!("DSCR of {dscr:.2} is below 1.20x — lender covenant risk"));
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::rent_roll::Unit;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// 20 units at $600/month (gross $144k/year), one vacant (5% vacancy),
    /// $1M purchase price: the pinned reference deal.
    pub(crate) fn reference_rent_roll() -> RentRoll {
        let units = (1..=20)
            .map(|i| Unit {
                unit_id: format!("{}", 100 + i),
                monthly_rent: dec!(600),
                occupied: i != 20,
                square_feet: Some(dec!(750)),
            })
            .collect();
        RentRoll {
            property_name: "Riverbend Flats".into(),
            address: "12 Riverbend Dr, Memphis TN".into(),
            purchase_price: dec!(1000000),
            total_units: 20,
            units,
        }
    }

    #[test]
    fn test_end_to_end_reference_deal() {
        let roll = reference_rent_roll();
        let out = underwrite(&roll, &Assumptions::default()).unwrap();
        let r = &out.result;

        assert_eq!(r.summary.gross_annual_rent, dec!(144000));
        assert_eq!(r.summary.vacancy_rate, dec!(0.05));
        assert_eq!(r.metrics.effective_gross_income, dec!(136800));
        assert_eq!(r.metrics.operating_expenses, dec!(47880));
        assert_eq!(r.metrics.noi, dec!(88920));
        assert_eq!(r.metrics.cap_rate, dec!(0.08892));
        assert_eq!(r.metrics.equity, dec!(300000));
        assert_eq!(r.metrics.loan_amount, dec!(700000));
        assert_eq!(r.metrics.debt_service, dec!(45500));
        assert_eq!(r.metrics.annual_cash_flow, dec!(43420));
        assert!((r.metrics.cash_on_cash - dec!(0.1447)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_reference_irr_in_pinned_range() {
        let roll = reference_rent_roll();
        let out = underwrite(&roll, &Assumptions::default()).unwrap();
        let irr = out.result.irr;
        assert!(
            irr > dec!(0.33) && irr < dec!(0.40),
            "5-year IRR {irr} outside pinned 33%-40% range"
        );
    }

    #[test]
    fn test_cash_flow_series_shape() {
        let roll = reference_rent_roll();
        let out = underwrite(&roll, &Assumptions::default()).unwrap();
        let flows = &out.result.equity_cash_flows;
        assert_eq!(flows.len(), 6);
        assert_eq!(flows[0], dec!(-300000));
        assert!(flows[5] > flows[4], "final year should include exit proceeds");
    }

    #[test]
    fn test_idempotent() {
        let roll = reference_rent_roll();
        let assumptions = Assumptions::default();
        let first = underwrite(&roll, &assumptions).unwrap();
        let second = underwrite(&roll, &assumptions).unwrap();
        assert_eq!(first.result, second.result);
        assert_eq!(first.warnings, second.warnings);
    }

    #[test]
    fn test_irr_monotone_in_rent_growth() {
        let roll = reference_rent_roll();
        let mut prev: Option<Decimal> = None;
        for growth in [dec!(0.00), dec!(0.01), dec!(0.03), dec!(0.05)] {
            let mut a = Assumptions::default();
            a.rent_growth = growth;
            let irr = underwrite(&roll, &a).unwrap().result.irr;
            if let Some(p) = prev {
                assert!(irr >= p, "IRR fell from {p} to {irr} as growth rose");
            }
            prev = Some(irr);
        }
    }

    #[test]
    fn test_invalid_assumptions_rejected_before_aggregation() {
        let roll = reference_rent_roll();
        let mut a = Assumptions::default();
        a.ltv = dec!(1.2);
        assert!(underwrite(&roll, &a).is_err());
    }

    #[test]
    fn test_high_leverage_warning() {
        let roll = reference_rent_roll();
        let mut a = Assumptions::default();
        a.ltv = dec!(0.85);
        let out = underwrite(&roll, &a).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("exceeds 80%")));
    }

    #[test]
    fn test_thin_dscr_warning() {
        let roll = reference_rent_roll();
        let mut a = Assumptions::default();
        a.ltv = dec!(0.95);
        a.interest_rate = dec!(0.085);
        let out = underwrite(&roll, &a).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("DSCR")));
    }

    #[test]
    fn test_envelope_echoes_assumptions() {
        let roll = reference_rent_roll();
        let out = underwrite(&roll, &Assumptions::default()).unwrap();
        assert_eq!(out.assumptions["hold_period"], serde_json::json!(5));
    }
}
