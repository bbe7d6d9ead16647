//! Tip, per-person share and total bill calculations.
//!
//! Every derived monetary field on the calculator screen is produced here
//! from the raw inputs in a single pass.
//!
//! # Calculation Structure
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Tax factor: 1 + sales tax / 100 |
//! | 2    | Tip base: bill × tax factor when tax-on-tip is set, else bill |
//! | 3    | Raw tip: tip base × tip percent / 100 |
//! | 4    | Total tip: raw tip rounded by the *bill* rounding policy |
//! | 5    | Tip per person: total tip / people, rounded by the *tip* rounding policy |
//! | 6    | Total bill: (tax-on-tip ? bill × tax factor : bill) + total tip |
//! | 7    | Total per person: total bill / people |
//!
//! The bill rounding policy is applied to the tip in step 4, not to the bill.
//! Callers that expose "round bill" toggles get tip rounding.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tip_core::Rounding;
//! use tip_core::calculations::{TipCalculation, TipInput};
//!
//! let input = TipInput {
//!     bill_amount: dec!(48.00),
//!     tip_percent: dec!(15),
//!     sales_tax: dec!(0),
//!     num_of_people: 2,
//!     bill_rounding: Rounding::Up,
//!     tip_rounding: Rounding::Exact,
//!     tax_on_tip: false,
//! };
//!
//! let result = TipCalculation::calculate(&input).unwrap();
//!
//! assert_eq!(result.total_tip, dec!(8));
//! assert_eq!(result.tip_per_person, dec!(4));
//! assert_eq!(result.total_bill_amount, dec!(56.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::calculations::common::{apply_rounding, percent_of};
use crate::models::Rounding;

/// Raw inputs for a tip calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipInput {
    /// Bill amount before tax and tip.
    pub bill_amount: Decimal,

    /// Tip percentage, e.g. `15` for 15%.
    pub tip_percent: Decimal,

    /// Sales tax percentage, e.g. `8.25`.
    pub sales_tax: Decimal,

    /// Number of people splitting the bill. Zero is treated as one.
    pub num_of_people: u32,

    /// Rounding applied to the total tip.
    pub bill_rounding: Rounding,

    /// Rounding applied to each person's share of the tip.
    pub tip_rounding: Rounding,

    /// Whether sales tax is added to the bill before the tip is computed.
    pub tax_on_tip: bool,
}

/// Derived monetary values. Unrounded except where a rounding policy applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipResult {
    /// Total tip (step 4).
    pub total_tip: Decimal,

    /// Each person's share of the tip (step 5).
    pub tip_per_person: Decimal,

    /// Bill plus tip, with tax when tax-on-tip is set (step 6).
    pub total_bill_amount: Decimal,

    /// Each person's share of the total bill (step 7).
    pub total_per_person: Decimal,
}

/// A derived value that does not fit in a [`Decimal`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("{step} is too large to calculate")]
pub struct TipOverflow {
    pub step: &'static str,
}

fn fits(
    value: Option<Decimal>,
    step: &'static str,
) -> Result<Decimal, TipOverflow> {
    value.ok_or(TipOverflow { step })
}

/// Stateless calculator for the derived fields of the tip screen.
#[derive(Debug, Clone, Copy)]
pub struct TipCalculation;

impl TipCalculation {
    /// Runs every step and returns the derived values.
    ///
    /// # Errors
    ///
    /// [`TipOverflow`] naming the first step whose result does not fit.
    pub fn calculate(input: &TipInput) -> Result<TipResult, TipOverflow> {
        let people = Self::people(input.num_of_people);

        let tip_base = Self::tip_base(input.bill_amount, input.sales_tax, input.tax_on_tip)?;
        let total_tip = Self::total_tip(tip_base, input.tip_percent, input.bill_rounding)?;
        let tip_per_person = Self::tip_per_person(total_tip, people, input.tip_rounding)?;
        let total_bill_amount = Self::total_bill_amount(
            input.bill_amount,
            input.sales_tax,
            input.tax_on_tip,
            total_tip,
        )?;
        let total_per_person = fits(total_bill_amount.checked_div(people), "total per person")?;

        trace!(
            bill = %input.bill_amount,
            tip_base = %tip_base,
            total_tip = %total_tip,
            tip_per_person = %tip_per_person,
            total_bill = %total_bill_amount,
            "tip recalculated"
        );

        Ok(TipResult {
            total_tip,
            tip_per_person,
            total_bill_amount,
            total_per_person,
        })
    }

    fn people(num_of_people: u32) -> Decimal {
        Decimal::from(num_of_people.max(1))
    }

    fn tax_factor(sales_tax: Decimal) -> Option<Decimal> {
        Decimal::ONE.checked_add(sales_tax.checked_div(Decimal::ONE_HUNDRED)?)
    }

    /// Amount the tip percentage is applied to (step 2).
    pub fn tip_base(
        bill_amount: Decimal,
        sales_tax: Decimal,
        tax_on_tip: bool,
    ) -> Result<Decimal, TipOverflow> {
        if tax_on_tip {
            let taxed = Self::tax_factor(sales_tax).and_then(|f| bill_amount.checked_mul(f));
            fits(taxed, "taxed bill")
        } else {
            Ok(bill_amount)
        }
    }

    /// Total tip (steps 3 and 4).
    pub fn total_tip(
        tip_base: Decimal,
        tip_percent: Decimal,
        bill_rounding: Rounding,
    ) -> Result<Decimal, TipOverflow> {
        let raw = fits(percent_of(tip_base, tip_percent), "tip")?;
        Ok(apply_rounding(raw, bill_rounding))
    }

    /// Tip share for one person (step 5).
    pub fn tip_per_person(
        total_tip: Decimal,
        people: Decimal,
        tip_rounding: Rounding,
    ) -> Result<Decimal, TipOverflow> {
        let share = fits(total_tip.checked_div(people), "tip per person")?;
        Ok(apply_rounding(share, tip_rounding))
    }

    /// Total bill (step 6).
    pub fn total_bill_amount(
        bill_amount: Decimal,
        sales_tax: Decimal,
        tax_on_tip: bool,
        total_tip: Decimal,
    ) -> Result<Decimal, TipOverflow> {
        let base = Self::tip_base(bill_amount, sales_tax, tax_on_tip)?;
        fits(base.checked_add(total_tip), "total bill")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::common::round_half_up;

    fn test_input() -> TipInput {
        TipInput {
            bill_amount: dec!(48.00),
            tip_percent: dec!(15),
            sales_tax: dec!(0),
            num_of_people: 1,
            bill_rounding: Rounding::Exact,
            tip_rounding: Rounding::Exact,
            tax_on_tip: false,
        }
    }

    // =========================================================================
    // tip_base tests
    // =========================================================================

    #[test]
    fn tip_base_is_bill_without_tax_on_tip() {
        let result = TipCalculation::tip_base(dec!(100.00), dec!(10), false).unwrap();

        assert_eq!(result, dec!(100.00));
    }

    #[test]
    fn tip_base_includes_tax_with_tax_on_tip() {
        let result = TipCalculation::tip_base(dec!(100.00), dec!(10), true).unwrap();

        assert_eq!(result, dec!(110.00));
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_exact_tip() {
        let result = TipCalculation::calculate(&test_input()).unwrap();

        assert_eq!(result.total_tip, dec!(7.20));
        assert_eq!(result.tip_per_person, dec!(7.20));
        assert_eq!(result.total_bill_amount, dec!(55.20));
        assert_eq!(result.total_per_person, dec!(55.20));
    }

    #[test]
    fn calculate_round_up_bill_rounds_the_tip() {
        let input = TipInput {
            bill_rounding: Rounding::Up,
            ..test_input()
        };

        let result = TipCalculation::calculate(&input).unwrap();

        // The "bill" policy lands on the tip, the bill itself stays 48.00.
        assert_eq!(result.total_tip, dec!(8));
        assert_eq!(result.total_bill_amount, dec!(56.00));
    }

    #[test]
    fn calculate_round_down_bill_floors_the_tip() {
        let input = TipInput {
            bill_rounding: Rounding::Down,
            ..test_input()
        };

        let result = TipCalculation::calculate(&input).unwrap();

        assert_eq!(result.total_tip, dec!(7));
        assert_eq!(result.total_bill_amount, dec!(55.00));
    }

    #[test]
    fn calculate_round_down_tip_floors_per_person_share() {
        let input = TipInput {
            bill_amount: dec!(36.70),
            tip_percent: dec!(10),
            tip_rounding: Rounding::Down,
            ..test_input()
        };

        let result = TipCalculation::calculate(&input).unwrap();

        assert_eq!(result.total_tip, dec!(3.67));
        assert_eq!(result.tip_per_person, dec!(3));
    }

    #[test]
    fn calculate_round_up_tip_ceils_per_person_share() {
        let input = TipInput {
            num_of_people: 3,
            tip_rounding: Rounding::Up,
            ..test_input()
        };

        let result = TipCalculation::calculate(&input).unwrap();

        assert_eq!(result.tip_per_person, dec!(3));
    }

    #[test]
    fn calculate_splits_between_people() {
        let input = TipInput {
            num_of_people: 3,
            ..test_input()
        };

        let result = TipCalculation::calculate(&input).unwrap();

        assert_eq!(result.tip_per_person, dec!(2.40));
        assert_eq!(result.total_per_person, dec!(18.40));
    }

    #[test]
    fn calculate_per_person_shares_add_back_to_tip() {
        for people in 1..=12u32 {
            let input = TipInput {
                bill_amount: dec!(123.45),
                tip_percent: dec!(18),
                num_of_people: people,
                ..test_input()
            };

            let result = TipCalculation::calculate(&input).unwrap();
            let rebuilt = round_half_up(result.tip_per_person) * Decimal::from(people);

            assert!(
                (rebuilt - result.total_tip).abs() <= dec!(0.01) * Decimal::from(people),
                "{people} people: {rebuilt} vs {}",
                result.total_tip
            );
        }
    }

    #[test]
    fn calculate_tax_on_tip_taxes_bill_and_tip_base() {
        let input = TipInput {
            bill_amount: dec!(100.00),
            sales_tax: dec!(10),
            tax_on_tip: true,
            ..test_input()
        };

        let result = TipCalculation::calculate(&input).unwrap();

        assert_eq!(result.total_tip, dec!(16.50));
        assert_eq!(result.total_bill_amount, dec!(126.50));
    }

    #[test]
    fn calculate_ignores_sales_tax_without_tax_on_tip() {
        let input = TipInput {
            bill_amount: dec!(100.00),
            sales_tax: dec!(10),
            ..test_input()
        };

        let result = TipCalculation::calculate(&input).unwrap();

        assert_eq!(result.total_tip, dec!(15.00));
        assert_eq!(result.total_bill_amount, dec!(115.00));
    }

    #[test]
    fn calculate_treats_zero_people_as_one() {
        let input = TipInput {
            num_of_people: 0,
            ..test_input()
        };

        let result = TipCalculation::calculate(&input).unwrap();

        assert_eq!(result.tip_per_person, dec!(7.20));
    }

    #[test]
    fn calculate_zero_bill_is_all_zero() {
        let input = TipInput {
            bill_amount: Decimal::ZERO,
            bill_rounding: Rounding::Up,
            ..test_input()
        };

        let result = TipCalculation::calculate(&input).unwrap();

        assert_eq!(result, TipResult::default());
    }

    // =========================================================================
    // overflow tests
    // =========================================================================

    #[test]
    fn calculate_reports_tip_overflow() {
        let input = TipInput {
            bill_amount: dec!(10.00),
            tip_percent: dec!(9999999999999999999999999999),
            ..test_input()
        };

        let result = TipCalculation::calculate(&input);

        assert_eq!(result, Err(TipOverflow { step: "tip" }));
    }

    #[test]
    fn calculate_reports_taxed_bill_overflow() {
        let input = TipInput {
            bill_amount: dec!(99999999.99),
            sales_tax: dec!(9999999999999999999999999999),
            tax_on_tip: true,
            ..test_input()
        };

        let result = TipCalculation::calculate(&input);

        assert_eq!(result, Err(TipOverflow { step: "taxed bill" }));
    }

    #[test]
    fn huge_tax_is_harmless_without_tax_on_tip() {
        let input = TipInput {
            sales_tax: dec!(9999999999999999999999999999),
            ..test_input()
        };

        let result = TipCalculation::calculate(&input).unwrap();

        assert_eq!(result.total_tip, dec!(7.20));
    }
}
