use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One layer of a progressive schedule.
///
/// `width` is the size of the layer, not a cumulative threshold. The final
/// layer of a schedule has no width and absorbs whatever income remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub width: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub const fn bounded(
        width: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            width: Some(width),
            rate,
        }
    }

    pub const fn unbounded(rate: Decimal) -> Self {
        Self { width: None, rate }
    }
}

/// PPh 21 tariff layers under UU HPP (Pasal 17 ayat 1 huruf a).
///
/// | Layer | Width              | Rate |
/// |-------|--------------------|------|
/// | 1     | Rp 60.000.000      | 5%   |
/// | 2     | Rp 190.000.000     | 15%  |
/// | 3     | Rp 250.000.000     | 25%  |
/// | 4     | Rp 4.500.000.000   | 30%  |
/// | 5     | remainder          | 35%  |
pub const PPH21_BRACKETS: [TaxBracket; 5] = [
    TaxBracket::bounded(dec!(60000000), dec!(0.05)),
    TaxBracket::bounded(dec!(190000000), dec!(0.15)),
    TaxBracket::bounded(dec!(250000000), dec!(0.25)),
    TaxBracket::bounded(dec!(4500000000), dec!(0.30)),
    TaxBracket::unbounded(dec!(0.35)),
];

/// A single touched layer in a [`TaxBreakdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketLine {
    pub rate: Decimal,
    /// Portion of taxable income that fell into this layer.
    pub taxed_amount: Decimal,
    /// `taxed_amount * rate`, rounded to the nearest Rupiah.
    pub tax: Decimal,
}

/// Per-layer explanation of a progressive tax computation.
///
/// `total` is the sum of the individually rounded [`BracketLine::tax`] values.
/// An empty breakdown means no tax is owed (taxable income ≤ 0).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub lines: Vec<BracketLine>,
    pub total: Decimal,
}

impl TaxBreakdown {
    pub fn no_tax_owed(&self) -> bool {
        self.lines.is_empty()
    }

    /// Rate of the highest layer reached, if any.
    pub fn marginal_rate(&self) -> Option<Decimal> {
        self.lines.last().map(|line| line.rate)
    }
}
