use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Individual;

/// Taxes owed by two individuals filing separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparateTaxes {
    pub taxable_income_a: Decimal,
    pub taxable_income_b: Decimal,
    pub tax_a: Decimal,
    pub tax_b: Decimal,
}

impl SeparateTaxes {
    pub fn total(&self) -> Decimal {
        self.tax_a + self.tax_b
    }
}

/// Combined (PH/MT) filing with the combined tax split by income share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub total_income: Decimal,
    pub total_exemption: Decimal,
    pub combined_taxable_income: Decimal,
    pub combined_tax: Decimal,

    /// `share_a + share_b == combined_tax` always holds.
    pub share_a: Decimal,
    pub share_b: Decimal,

    /// Share minus what was already paid. Negative means overpaid.
    pub shortfall_a: Decimal,
    pub shortfall_b: Decimal,
}

/// Everything one "calculate" action produces for a household.
///
/// Handed as-is to any later detail rendering so nothing has to be recomputed
/// or stashed in shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdComparison {
    /// Inputs, with `already_paid` set to each separate-filing tax.
    pub a: Individual,
    pub b: Individual,
    pub separate: SeparateTaxes,
    pub combined: AllocationResult,
}
