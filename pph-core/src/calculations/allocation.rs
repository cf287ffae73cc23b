//! Separate vs combined (PH/MT) filing for a two-person household.
//!
//! Under combined filing the spouses' incomes and exemptions are pooled, the
//! pooled PKP is taxed once, and the resulting tax is split in proportion to
//! each spouse's gross income. Comparing each share with what that spouse
//! already paid when filing separately gives the shortfall (kurang bayar) or,
//! when negative, the overpayment (lebih bayar).
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use pph_core::{Individual, simulate_household};
//!
//! let husband = Individual::new(dec!(100000000), dec!(54000000));
//! let wife = Individual::new(dec!(0), dec!(54000000));
//!
//! let household = simulate_household(husband, wife);
//!
//! assert_eq!(household.separate.tax_a, dec!(2300000));
//! assert_eq!(household.combined.combined_tax, dec!(0));
//! assert_eq!(household.combined.shortfall_a, dec!(-2300000));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{non_negative, proportional_share};
use crate::calculations::progressive::compute_tax;
use crate::models::{AllocationResult, HouseholdComparison, Individual, SeparateTaxes};

/// Taxes each individual on their own PKP.
pub fn compute_separate(
    a: &Individual,
    b: &Individual,
) -> SeparateTaxes {
    let taxable_income_a = a.taxable_income();
    let taxable_income_b = b.taxable_income();

    SeparateTaxes {
        taxable_income_a,
        taxable_income_b,
        tax_a: compute_tax(taxable_income_a),
        tax_b: compute_tax(taxable_income_b),
    }
}

/// Pools both incomes and exemptions, taxes the pooled PKP, and allocates the
/// tax by income share.
///
/// A's share is rounded; B receives the remainder so the shares always add up
/// to the combined tax. With no income at all both shares are zero.
pub fn compute_combined_allocation(
    a: &Individual,
    b: &Individual,
) -> AllocationResult {
    let total_income = a.gross_income.saturating_add(b.gross_income);
    let total_exemption = a.exemption.saturating_add(b.exemption);
    let combined_taxable_income = non_negative(total_income.saturating_sub(total_exemption));
    let combined_tax = compute_tax(combined_taxable_income);

    let (share_a, share_b) = if total_income > Decimal::ZERO {
        let share_a = proportional_share(combined_tax, a.gross_income, total_income);
        (share_a, combined_tax - share_a)
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    debug!(
        %total_income,
        %combined_taxable_income,
        %combined_tax,
        %share_a,
        %share_b,
        "combined allocation"
    );

    AllocationResult {
        total_income,
        total_exemption,
        combined_taxable_income,
        combined_tax,
        share_a,
        share_b,
        shortfall_a: share_a.saturating_sub(a.already_paid),
        shortfall_b: share_b.saturating_sub(b.already_paid),
    }
}

/// Runs separate filing, records each separate tax as already paid, then runs
/// the combined allocation against it.
pub fn simulate_household(
    a: Individual,
    b: Individual,
) -> HouseholdComparison {
    let separate = compute_separate(&a, &b);
    let a = a.with_already_paid(separate.tax_a);
    let b = b.with_already_paid(separate.tax_b);
    let combined = compute_combined_allocation(&a, &b);

    HouseholdComparison {
        a,
        b,
        separate,
        combined,
    }
}
