use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::UnderwriteError;
use crate::types::{Money, Rate};
use crate::UnderwriteResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single rental unit as reported on the rent roll. Immutable once
/// ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub unit_id: String,
    /// Scheduled monthly rent (market rent if the unit is vacant)
    pub monthly_rent: Money,
    pub occupied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub square_feet: Option<Decimal>,
}

/// Normalized rent roll for a property under evaluation, as produced by the
/// upstream rent roll normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentRoll {
    pub property_name: String,
    pub address: String,
    pub purchase_price: Money,
    /// Unit count as reported by the offering memorandum
    pub total_units: u32,
    pub units: Vec<Unit>,
}

/// Income and occupancy figures reduced from the unit list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentRollSummary {
    pub monthly_rent_total: Money,
    pub gross_annual_rent: Money,
    /// Fraction of listed units that are vacant, in [0, 1]
    pub vacancy_rate: Rate,
    pub occupied_units: u32,
    pub vacant_units: u32,
}

// ---------------------------------------------------------------------------
// Unit aggregation
// ---------------------------------------------------------------------------

/// Reduce a rent roll to its gross income and vacancy figures.
///
/// A mismatch between the reported unit count and the listed units is a
/// reportable discrepancy: it is pushed into `warnings` and derived figures
/// use the listed units, never a silent fix of either number.
pub fn aggregate_units(
    rent_roll: &RentRoll,
    warnings: &mut Vec<String>,
) -> UnderwriteResult<RentRollSummary> {
    if rent_roll.units.is_empty() || rent_roll.total_units == 0 {
        return Err(UnderwriteError::InvalidInput {
            field: "units".into(),
            reason: "Rent roll must contain at least one unit".into(),
        });
    }

    if rent_roll.purchase_price <= Decimal::ZERO {
        return Err(UnderwriteError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price must be positive".into(),
        });
    }

    for (i, unit) in rent_roll.units.iter().enumerate() {
        if unit.monthly_rent < Decimal::ZERO {
            return Err(UnderwriteError::InvalidInput {
                field: format!("units[{i}].monthly_rent"),
                reason: format!("Negative rent for unit '{}'", unit.unit_id),
            });
        }
    }

    let listed = rent_roll.units.len() as u32;
    if listed != rent_roll.total_units {
        warnings.push(format!(
            "Unit count mismatch: reported {}, listed {}",
            rent_roll.total_units, listed
        ));
    }

    let monthly_rent_total: Money = rent_roll.units.iter().map(|u| u.monthly_rent).sum();
    let vacant_units = rent_roll.units.iter().filter(|u| !u.occupied).count() as u32;
    let vacancy_rate = Decimal::from(vacant_units) / Decimal::from(listed);

    Ok(RentRollSummary {
        monthly_rent_total,
        gross_annual_rent: monthly_rent_total * dec!(12),
        vacancy_rate,
        occupied_units: listed - vacant_units,
        vacant_units,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn unit(id: &str, rent: Decimal, occupied: bool) -> Unit {
        Unit {
            unit_id: id.into(),
            monthly_rent: rent,
            occupied,
            square_feet: None,
        }
    }

    fn sample_rent_roll() -> RentRoll {
        RentRoll {
            property_name: "Maple Court".into(),
            address: "400 Maple Ct, Columbus OH".into(),
            purchase_price: dec!(1000000),
            total_units: 4,
            units: vec![
                unit("101", dec!(1000), true),
                unit("102", dec!(1100), true),
                unit("103", dec!(950), false),
                unit("104", dec!(1050), true),
            ],
        }
    }

    #[test]
    fn test_gross_rent_and_vacancy() {
        let roll = sample_rent_roll();
        let mut warnings = Vec::new();
        let summary = aggregate_units(&roll, &mut warnings).unwrap();

        assert_eq!(summary.monthly_rent_total, dec!(4100));
        assert_eq!(summary.gross_annual_rent, dec!(49200));
        assert_eq!(summary.vacancy_rate, dec!(0.25));
        assert_eq!(summary.occupied_units, 3);
        assert_eq!(summary.vacant_units, 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_fully_occupied_has_zero_vacancy() {
        let mut roll = sample_rent_roll();
        for u in &mut roll.units {
            u.occupied = true;
        }
        let mut warnings = Vec::new();
        let summary = aggregate_units(&roll, &mut warnings).unwrap();
        assert_eq!(summary.vacancy_rate, Decimal::ZERO);
    }

    #[test]
    fn test_empty_rent_roll_error() {
        let mut roll = sample_rent_roll();
        roll.units.clear();
        roll.total_units = 0;
        let mut warnings = Vec::new();
        let result = aggregate_units(&roll, &mut warnings);
        assert!(matches!(
            result.unwrap_err(),
            UnderwriteError::InvalidInput { field, .. } if field == "units"
        ));
    }

    #[test]
    fn test_negative_rent_error() {
        let mut roll = sample_rent_roll();
        roll.units[2].monthly_rent = dec!(-50);
        let mut warnings = Vec::new();
        let result = aggregate_units(&roll, &mut warnings);
        match result.unwrap_err() {
            UnderwriteError::InvalidInput { field, reason } => {
                assert_eq!(field, "units[2].monthly_rent");
                assert!(reason.contains("103"));
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_rent_is_allowed() {
        let mut roll = sample_rent_roll();
        roll.units[0].monthly_rent = Decimal::ZERO;
        let mut warnings = Vec::new();
        let summary = aggregate_units(&roll, &mut warnings).unwrap();
        assert_eq!(summary.monthly_rent_total, dec!(3100));
    }

    #[test]
    fn test_non_positive_purchase_price_error() {
        let mut roll = sample_rent_roll();
        roll.purchase_price = Decimal::ZERO;
        let mut warnings = Vec::new();
        assert!(aggregate_units(&roll, &mut warnings).is_err());
    }

    #[test]
    fn test_unit_count_mismatch_is_warned_not_fixed() {
        let mut roll = sample_rent_roll();
        roll.total_units = 6;
        let mut warnings = Vec::new();
        let summary = aggregate_units(&roll, &mut warnings).unwrap();

        // Derived figures use the listed units
        assert_eq!(summary.vacancy_rate, dec!(0.25));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("reported 6, listed 4"));
    }
}
