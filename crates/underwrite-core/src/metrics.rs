use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::error::UnderwriteError;
use crate::types::{Money, Rate};
use crate::UnderwriteResult;

/// Point-in-time (year 0) underwriting metrics. Every field is derived; no
/// field is independently settable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub gross_annual_rent: Money,
    pub effective_gross_income: Money,
    pub operating_expenses: Money,
    pub noi: Money,
    pub cap_rate: Rate,
    pub loan_amount: Money,
    pub equity: Money,
    pub debt_service: Money,
    pub annual_cash_flow: Money,
    pub cash_on_cash: Rate,
    /// NOI / debt service. Absent for an all-cash (zero debt service) deal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dscr: Option<Rate>,
}

/// Step-wise underwriting formulas: EGI → OpEx → NOI → cap rate → debt
/// structure → cash flow → cash-on-cash.
///
/// The step order is load-bearing: each figure derives only from earlier
/// ones, and every ratio is computed from the single NOI figure produced in
/// step 3. Nothing downstream recomputes EGI or NOI, so displayed figures
/// cannot drift apart.
pub fn calculate_metrics(
    gross_annual_rent: Money,
    vacancy_rate: Rate,
    purchase_price: Money,
    assumptions: &Assumptions,
) -> UnderwriteResult<FinancialMetrics> {
    // Steps 1-3: income
    let effective_gross_income = gross_annual_rent * (Decimal::ONE - vacancy_rate);
    let operating_expenses = effective_gross_income * assumptions.expense_ratio;
    let noi = effective_gross_income - operating_expenses;

    // Step 4: cap rate
    if purchase_price <= Decimal::ZERO {
        return Err(UnderwriteError::DivisionByZero {
            context: "cap rate (NOI / purchase_price)".into(),
        });
    }
    let cap_rate = noi / purchase_price;

    // Step 5: capital structure
    let equity = purchase_price * (Decimal::ONE - assumptions.ltv);
    let loan_amount = purchase_price * assumptions.ltv;

    // Steps 6-7: interest-only debt, so principal is constant through the
    // hold and the exit payoff equals the original loan amount
    let debt_service = loan_amount * assumptions.interest_rate;
    let annual_cash_flow = noi - debt_service;

    // Step 8: cash-on-cash
    if equity <= Decimal::ZERO {
        return Err(UnderwriteError::DivisionByZero {
            context: "cash-on-cash (annual cash flow / equity)".into(),
        });
    }
    let cash_on_cash = annual_cash_flow / equity;

    let dscr = if debt_service > Decimal::ZERO {
        Some(noi / debt_service)
    } else {
        None
    };

    Ok(FinancialMetrics {
        gross_annual_rent,
        effective_gross_income,
        operating_expenses,
        noi,
        cap_rate,
        loan_amount,
        equity,
        debt_service,
        annual_cash_flow,
        cash_on_cash,
        dscr,
    })
}
