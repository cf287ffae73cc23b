use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognised PTKP status '{0}' (expected TK/0..TK/3 or K/0..K/3)")]
pub struct PtkpStatusError(pub String);

/// Marital/dependent status used to look up a PTKP amount.
///
/// `TK` is *tidak kawin* (unmarried), `K` is *kawin* (married); the digit is
/// the number of dependents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PtkpStatus {
    #[serde(rename = "TK/0")]
    Tk0,
    #[serde(rename = "TK/1")]
    Tk1,
    #[serde(rename = "TK/2")]
    Tk2,
    #[serde(rename = "TK/3")]
    Tk3,
    #[serde(rename = "K/0")]
    K0,
    #[serde(rename = "K/1")]
    K1,
    #[serde(rename = "K/2")]
    K2,
    #[serde(rename = "K/3")]
    K3,
}

impl PtkpStatus {
    pub fn all() -> &'static [PtkpStatus] {
        &[
            Self::Tk0,
            Self::Tk1,
            Self::Tk2,
            Self::Tk3,
            Self::K0,
            Self::K1,
            Self::K2,
            Self::K3,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tk0 => "TK/0",
            Self::Tk1 => "TK/1",
            Self::Tk2 => "TK/2",
            Self::Tk3 => "TK/3",
            Self::K0 => "K/0",
            Self::K1 => "K/1",
            Self::K2 => "K/2",
            Self::K3 => "K/3",
        }
    }

    /// Parses `TK/0`, `tk0`, `K/2`, ... Case-insensitive; the slash is optional.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '/')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        match normalized.as_str() {
            "TK0" => Some(Self::Tk0),
            "TK1" => Some(Self::Tk1),
            "TK2" => Some(Self::Tk2),
            "TK3" => Some(Self::Tk3),
            "K0" => Some(Self::K0),
            "K1" => Some(Self::K1),
            "K2" => Some(Self::K2),
            "K3" => Some(Self::K3),
            _ => None,
        }
    }

    pub fn is_married(&self) -> bool {
        matches!(self, Self::K0 | Self::K1 | Self::K2 | Self::K3)
    }

    pub fn dependents(&self) -> u8 {
        match self {
            Self::Tk0 | Self::K0 => 0,
            Self::Tk1 | Self::K1 => 1,
            Self::Tk2 | Self::K2 => 2,
            Self::Tk3 | Self::K3 => 3,
        }
    }
}

impl fmt::Display for PtkpStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PtkpStatus {
    type Err = PtkpStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| PtkpStatusError(s.to_string()))
    }
}

/// Annual PTKP amounts (PMK 101/PMK.010/2016).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PtkpTable {
    /// Exemption for the taxpayer themself.
    pub base: Decimal,
    /// Extra exemption for a married taxpayer.
    pub married_addition: Decimal,
    /// Extra exemption per dependent. At most three dependents count.
    pub per_dependent: Decimal,
}

impl Default for PtkpTable {
    fn default() -> Self {
        Self {
            base: dec!(54000000),
            married_addition: dec!(4500000),
            per_dependent: dec!(4500000),
        }
    }
}

impl PtkpTable {
    pub fn amount(
        &self,
        status: PtkpStatus,
    ) -> Decimal {
        let married = if status.is_married() {
            self.married_addition
        } else {
            Decimal::ZERO
        };
        let dependents = Decimal::from(status.dependents());

        self.base
            .saturating_add(married)
            .saturating_add(self.per_dependent.saturating_mul(dependents))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // PtkpStatus parsing
    // =========================================================================

    #[test]
    fn parse_accepts_canonical_codes() {
        for status in PtkpStatus::all() {
            assert_eq!(PtkpStatus::parse(status.as_str()), Some(*status));
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_slash_optional() {
        assert_eq!(PtkpStatus::parse("tk0"), Some(PtkpStatus::Tk0));
        assert_eq!(PtkpStatus::parse(" k/3 "), Some(PtkpStatus::K3));
        assert_eq!(PtkpStatus::parse("Tk/2"), Some(PtkpStatus::Tk2));
    }

    #[test]
    fn parse_rejects_unknown_codes() {
        assert_eq!(PtkpStatus::parse("K/4"), None);
        assert_eq!(PtkpStatus::parse("HB/0"), None);
        assert_eq!(PtkpStatus::parse(""), None);
    }

    #[test]
    fn from_str_reports_offending_value() {
        let err = "X/1".parse::<PtkpStatus>().unwrap_err();

        assert_eq!(err, PtkpStatusError("X/1".to_string()));
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(PtkpStatus::K1.to_string(), "K/1");
    }

    // =========================================================================
    // PtkpTable lookup
    // =========================================================================

    #[test]
    fn default_table_amounts() {
        let table = PtkpTable::default();
        let cases = [
            (PtkpStatus::Tk0, dec!(54000000)),
            (PtkpStatus::Tk1, dec!(58500000)),
            (PtkpStatus::Tk2, dec!(63000000)),
            (PtkpStatus::Tk3, dec!(67500000)),
            (PtkpStatus::K0, dec!(58500000)),
            (PtkpStatus::K1, dec!(63000000)),
            (PtkpStatus::K2, dec!(67500000)),
            (PtkpStatus::K3, dec!(72000000)),
        ];

        for (status, expected) in cases {
            assert_eq!(table.amount(status), expected, "PTKP for {status}");
        }
    }

    #[test]
    fn custom_table_is_respected() {
        let table = PtkpTable {
            base: dec!(10),
            married_addition: dec!(2),
            per_dependent: dec!(1),
        };

        assert_eq!(table.amount(PtkpStatus::K3), dec!(15));
        assert_eq!(table.amount(PtkpStatus::Tk0), dec!(10));
    }
}
