use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use pph_core::calculations::common::{MAX_RUPIAH, round_rupiah};
use pph_core::{PtkpStatus, PtkpTable};
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

/// Optional `Rp` prefix, optional sign, then digits grouped by `.` or `,`.
static RUPIAH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:rp)\.?\s*(-?)\s*([0-9][0-9.,]*)$|^(-?)\s*([0-9][0-9.,]*)$")
        .expect("rupiah pattern is valid")
});

/// Error returned when a string cannot be read as a Rupiah amount.
#[derive(Debug, Error)]
pub enum ParseRupiahError {
    #[error("invalid Rupiah amount '{0}'")]
    Invalid(String),

    #[error("negative Rupiah amount '{0}' is not allowed")]
    Negative(String),

    #[error("Rupiah amount '{0}' exceeds the maximum of 10^18")]
    OutOfRange(String),
}

/// Parses a whole-Rupiah amount as typed into a form.
///
/// Accepts `1000000`, `1.000.000`, `Rp 1.000.000` and `Rp1,000,000`; every
/// `.` and `,` is treated as a thousands separator. Empty or whitespace-only
/// input is treated as 0. Negative amounts and amounts above [`MAX_RUPIAH`]
/// are rejected.
pub fn parse_rupiah(s: &str) -> Result<Decimal, ParseRupiahError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let captures = RUPIAH_PATTERN
        .captures(trimmed)
        .ok_or_else(|| ParseRupiahError::Invalid(s.to_string()))?;
    let (sign, digits) = match (captures.get(1), captures.get(2)) {
        (Some(sign), Some(digits)) => (sign.as_str(), digits.as_str()),
        _ => (
            captures.get(3).map_or("", |m| m.as_str()),
            captures.get(4).map_or("", |m| m.as_str()),
        ),
    };
    if sign == "-" {
        return Err(ParseRupiahError::Negative(s.to_string()));
    }

    let digits: String = digits.chars().filter(char::is_ascii_digit).collect();
    digits
        .parse::<Decimal>()
        .ok()
        .filter(|amount| *amount <= MAX_RUPIAH)
        .ok_or_else(|| ParseRupiahError::OutOfRange(s.to_string()))
}

/// Formats an amount the way id-ID locales display Rupiah: `Rp 1.234.567`.
///
/// The amount is rounded to whole Rupiah first. Negative values render as
/// `Rp -1.234.567`.
pub fn format_rupiah(amount: Decimal) -> String {
    let whole = round_rupiah(amount);
    let digits = whole.abs().trunc().to_string();
    let grouped = group_thousands(&digits);

    if whole.is_sign_negative() && !whole.is_zero() {
        format!("Rp -{grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

/// Formats a fractional rate as a percentage: `0.05` → `5%`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is neither a PTKP status (TK/0..TK/3, K/0..K/3) nor a Rupiah amount")]
pub struct ExemptionError(pub String);

/// A PTKP given either as a status code to look up or as an explicit amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exemption {
    Status(PtkpStatus),
    Amount(Decimal),
}

impl Exemption {
    pub fn resolve(
        &self,
        table: &PtkpTable,
    ) -> Decimal {
        match self {
            Self::Status(status) => table.amount(*status),
            Self::Amount(amount) => *amount,
        }
    }
}

impl FromStr for Exemption {
    type Err = ExemptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ExemptionError(s.to_string()));
        }
        if let Some(status) = PtkpStatus::parse(s) {
            return Ok(Self::Status(status));
        }
        parse_rupiah(s)
            .map(Self::Amount)
            .map_err(|_| ExemptionError(s.to_string()))
    }
}

impl fmt::Display for Exemption {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "{status}"),
            Self::Amount(amount) => f.write_str(&format_rupiah(*amount)),
        }
    }
}
