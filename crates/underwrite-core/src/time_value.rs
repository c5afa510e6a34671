use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::UnderwriteError;
use crate::types::{Money, Rate};
use crate::UnderwriteResult;

/// NPV convergence tolerance, applied relative to the initial outlay.
const NPV_TOLERANCE: Decimal = dec!(0.000001);
const MAX_ITERATIONS: u32 = 1000;
const INITIAL_GUESS: Rate = dec!(0.10);
/// Root search interval, used both to clamp Newton iterates and as the
/// bisection bracket.
const BRACKET_LOW: Rate = dec!(-0.99);
const BRACKET_HIGH: Rate = dec!(10.0);
const DERIVATIVE_FLOOR: Decimal = dec!(0.000000001);

/// Net Present Value of a series of cash flows at a given discount rate.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> UnderwriteResult<Money> {
    if rate <= dec!(-1) {
        return Err(UnderwriteError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }
    Ok(npv_saturating(cash_flows, rate))
}

/// Internal Rate of Return: the rate that zeroes the NPV of `cash_flows`
/// (index 0 is the initial outlay, typically negative).
///
/// Newton-Raphson seeded at 10% with iterates clamped to the search
/// interval; falls back to bisection over the same interval when the
/// derivative breaks down or the iteration budget is exhausted. Convergence
/// is on |NPV| scaled by the initial outlay, so the result is deterministic
/// for a given series. A series with no root in the interval is a
/// `ConvergenceFailure`, never a silent 0.
pub fn irr(cash_flows: &[Money]) -> UnderwriteResult<Rate> {
    if cash_flows.len() < 2 {
        return Err(UnderwriteError::InvalidInput {
            field: "cash_flows".into(),
            reason: "IRR requires at least 2 cash flows".into(),
        });
    }

    let scale = cash_flows[0].abs().max(Decimal::ONE);
    let tolerance = NPV_TOLERANCE * scale;

    let mut rate = INITIAL_GUESS;
    for _ in 0..MAX_ITERATIONS {
        let Some((npv_val, dnpv)) = npv_and_derivative(cash_flows, rate) else {
            break;
        };

        if npv_val.abs() < tolerance {
            return Ok(rate);
        }

        if dnpv.abs() < DERIVATIVE_FLOOR {
            break;
        }

        let Some(mut next) = npv_val
            .checked_div(dnpv)
            .and_then(|step| rate.checked_sub(step))
        else {
            break;
        };
        if next < BRACKET_LOW {
            next = BRACKET_LOW;
        } else if next > BRACKET_HIGH {
            next = BRACKET_HIGH;
        }
        rate = next;
    }

    bisect(cash_flows, tolerance)
}

/// NPV(r) = Σ CF_t / (1+r)^t and its derivative d(NPV)/dr. Returns None on
/// decimal overflow (rates hugging the -100% bound).
fn npv_and_derivative(cash_flows: &[Money], rate: Rate) -> Option<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    let mut factor = Decimal::ONE; // (1+r)^t
    let mut npv_val = Decimal::ZERO;
    let mut dnpv = Decimal::ZERO;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            factor = factor.checked_mul(one_plus_r)?;
        }
        let term = cf.checked_div(factor)?;
        npv_val = npv_val.checked_add(term)?;
        if t > 0 {
            // d/dr of CF_t / (1+r)^t = -t * CF_t / (1+r)^(t+1)
            let d = Decimal::from(t as i64)
                .checked_mul(term)?
                .checked_div(one_plus_r)?;
            dnpv = dnpv.checked_sub(d)?;
        }
    }

    Some((npv_val, dnpv))
}

/// NPV that saturates instead of overflowing near the -100% bound. The
/// overflowing term dominates the sum, so its sign is the sign bisection
/// needs.
fn npv_saturating(cash_flows: &[Money], rate: Rate) -> Money {
    let one_plus_r = Decimal::ONE + rate;
    let mut factor = Decimal::ONE;
    let mut total = Decimal::ZERO;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            factor = match factor.checked_mul(one_plus_r) {
                Some(f) if !f.is_zero() => f,
                _ => return saturate(*cf),
            };
        }
        let term = match cf.checked_div(factor) {
            Some(v) => v,
            None => return saturate(*cf),
        };
        total = match total.checked_add(term) {
            Some(v) => v,
            None => return saturate(term),
        };
    }

    total
}

fn saturate(sample: Decimal) -> Decimal {
    if sample.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

fn bisect(cash_flows: &[Money], tolerance: Decimal) -> UnderwriteResult<Rate> {
    let mut low = BRACKET_LOW;
    let mut high = BRACKET_HIGH;
    let mut npv_low = npv_saturating(cash_flows, low);
    let npv_high = npv_saturating(cash_flows, high);

    if npv_low.abs() < tolerance {
        return Ok(low);
    }
    if npv_high.abs() < tolerance {
        return Ok(high);
    }
    if (npv_low < Decimal::ZERO) == (npv_high < Decimal::ZERO) {
        // No sign change: no root inside the search interval
        return Err(UnderwriteError::ConvergenceFailure {
            function: "irr".into(),
            iterations: MAX_ITERATIONS,
            last_npv: npv_low,
        });
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / dec!(2);
        let npv_mid = npv_saturating(cash_flows, mid);

        if npv_mid.abs() < tolerance {
            return Ok(mid);
        }

        if (npv_mid < Decimal::ZERO) == (npv_low < Decimal::ZERO) {
            low = mid;
            npv_low = npv_mid;
        } else {
            high = mid;
        }
    }

    Err(UnderwriteError::ConvergenceFailure {
        function: "irr".into(),
        iterations: MAX_ITERATIONS,
        last_npv: npv_low,
    })
}
