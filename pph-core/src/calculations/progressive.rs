//! Progressive bracket tax (PPh 21 Pasal 17 tariff).
//!
//! Taxable income (PKP) fills each layer of the schedule in order; the tax is
//! the sum of every filled portion times that layer's rate.
//!
//! Two entry points share the same walk but round differently:
//!
//! - [`BracketTaxEngine::compute_tax`] sums the exact per-layer products and
//!   rounds once at the end.
//! - [`BracketTaxEngine::compute_tax_breakdown`] rounds every layer's tax before
//!   summing, matching the figures shown in a step-by-step explanation.
//!
//! For [`PPH21_BRACKETS`] every fully consumed layer yields a whole-Rupiah tax,
//! so only the last touched layer is ever rounded and both totals agree. A
//! custom schedule with fractional layer products can make them differ by a
//! few Rupiah.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use pph_core::calculations::{compute_tax, compute_tax_breakdown};
//!
//! assert_eq!(compute_tax(dec!(100000000)), dec!(9000000));
//!
//! let breakdown = compute_tax_breakdown(dec!(100000000));
//! assert_eq!(breakdown.lines.len(), 2);
//! assert_eq!(breakdown.total, dec!(9000000));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::trace;

use crate::calculations::common::round_rupiah;
use crate::models::{BracketLine, PPH21_BRACKETS, TaxBracket, TaxBreakdown};

/// Problems with a caller-supplied bracket schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketScheduleError {
    #[error("no tax brackets provided")]
    NoTaxBrackets,

    #[error("bracket {index} has rate {rate} outside [0, 1]")]
    RateOutOfRange { index: usize, rate: Decimal },

    #[error("bracket {index} has non-positive width {width}")]
    NonPositiveWidth { index: usize, width: Decimal },

    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedNotLast { index: usize },

    #[error("last bracket must be unbounded")]
    LastBracketBounded,
}

/// Computes progressive tax over an ordered bracket schedule.
#[derive(Debug, Clone, Copy)]
pub struct BracketTaxEngine<'a> {
    brackets: &'a [TaxBracket],
}

impl Default for BracketTaxEngine<'static> {
    fn default() -> Self {
        Self::pph21()
    }
}

impl<'a> BracketTaxEngine<'a> {
    /// Engine over the fixed UU HPP schedule.
    pub const fn pph21() -> BracketTaxEngine<'static> {
        BracketTaxEngine {
            brackets: &PPH21_BRACKETS,
        }
    }

    /// Creates an engine over `brackets`, which must be in ascending order and
    /// end with a single unbounded layer.
    ///
    /// # Errors
    ///
    /// Returns [`BracketScheduleError`] if the schedule is empty, a rate lies
    /// outside `[0, 1]`, a width is not positive, or the unbounded layer is
    /// missing or misplaced.
    pub fn new(brackets: &'a [TaxBracket]) -> Result<Self, BracketScheduleError> {
        let last = brackets
            .len()
            .checked_sub(1)
            .ok_or(BracketScheduleError::NoTaxBrackets)?;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketScheduleError::RateOutOfRange {
                    index,
                    rate: bracket.rate,
                });
            }
            match bracket.width {
                Some(width) if width <= Decimal::ZERO => {
                    return Err(BracketScheduleError::NonPositiveWidth { index, width });
                }
                Some(_) if index == last => return Err(BracketScheduleError::LastBracketBounded),
                None if index != last => {
                    return Err(BracketScheduleError::UnboundedNotLast { index });
                }
                _ => {}
            }
        }

        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &'a [TaxBracket] {
        self.brackets
    }

    /// Tax owed on `taxable_income`, rounded once to the nearest Rupiah.
    ///
    /// Values ≤ 0 owe nothing.
    pub fn compute_tax(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        let tax: Decimal = self
            .layers(taxable_income)
            .map(|(bracket, consumed)| consumed * bracket.rate)
            .sum();

        trace!(%taxable_income, %tax, "progressive tax");
        round_rupiah(tax)
    }

    /// Per-layer breakdown of the tax on `taxable_income`.
    ///
    /// Only layers with a non-zero consumed amount appear. Each layer's tax is
    /// rounded on its own and `total` is their sum. Values ≤ 0 produce an
    /// empty breakdown (see [`TaxBreakdown::no_tax_owed`]).
    pub fn compute_tax_breakdown(
        &self,
        taxable_income: Decimal,
    ) -> TaxBreakdown {
        let lines: Vec<BracketLine> = self
            .layers(taxable_income)
            .map(|(bracket, consumed)| BracketLine {
                rate: bracket.rate,
                taxed_amount: consumed,
                tax: round_rupiah(consumed * bracket.rate),
            })
            .collect();
        let total = lines.iter().map(|line| line.tax).sum();

        TaxBreakdown { lines, total }
    }

    /// Rate of the layer being filled at `taxable_income`, `None` when ≤ 0.
    pub fn marginal_rate(
        &self,
        taxable_income: Decimal,
    ) -> Option<Decimal> {
        self.layers(taxable_income)
            .last()
            .map(|(bracket, _)| bracket.rate)
    }

    /// Walks the schedule, yielding each touched layer with the amount it
    /// absorbed. Stops as soon as nothing remains.
    fn layers(
        &self,
        taxable_income: Decimal,
    ) -> impl Iterator<Item = (&'a TaxBracket, Decimal)> + use<'a> {
        let brackets = self.brackets;
        brackets
            .iter()
            .scan(taxable_income, |remaining, bracket| {
                if *remaining <= Decimal::ZERO {
                    return None;
                }
                let consumed = bracket
                    .width
                    .map_or(*remaining, |width| (*remaining).min(width));
                *remaining -= consumed;
                Some((bracket, consumed))
            })
    }
}

/// [`BracketTaxEngine::compute_tax`] over [`PPH21_BRACKETS`].
pub fn compute_tax(taxable_income: Decimal) -> Decimal {
    BracketTaxEngine::pph21().compute_tax(taxable_income)
}

/// [`BracketTaxEngine::compute_tax_breakdown`] over [`PPH21_BRACKETS`].
pub fn compute_tax_breakdown(taxable_income: Decimal) -> TaxBreakdown {
    BracketTaxEngine::pph21().compute_tax_breakdown(taxable_income)
}
