use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One taxpayer in a household simulation.
///
/// Amounts are expected to be sanitised (non-negative) by the caller. The
/// exemption (PTKP) comes from whatever lookup the caller owns, typically
/// [`PtkpTable`](crate::PtkpTable).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    /// Annual net income (penghasilan neto).
    pub gross_income: Decimal,

    /// Personal exemption (PTKP).
    pub exemption: Decimal,

    /// Tax already settled when filing separately. Only used when contrasting
    /// against a combined filing.
    pub already_paid: Decimal,
}

impl Individual {
    pub fn new(
        gross_income: Decimal,
        exemption: Decimal,
    ) -> Self {
        Self {
            gross_income,
            exemption,
            already_paid: Decimal::ZERO,
        }
    }

    pub fn with_already_paid(
        mut self,
        already_paid: Decimal,
    ) -> Self {
        self.already_paid = already_paid;
        self
    }

    /// PKP: gross income minus exemption, floored at zero.
    pub fn taxable_income(&self) -> Decimal {
        self.gross_income
            .saturating_sub(self.exemption)
            .max(Decimal::ZERO)
    }
}
