//! CSV loader for household batch input, and writer for the results.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does **not** matter. Values
//! are trimmed.
//!
//! | Column     | Required | Type   | Notes                                        |
//! |------------|----------|--------|----------------------------------------------|
//! | `label`    | no       | string | Defaults to `row <n>`                        |
//! | `income_a` | yes      | Rupiah | `100000000` or `100.000.000`                 |
//! | `ptkp_a`   | yes      | PTKP   | Status code (`K/0`) or amount (`58.500.000`) |
//! | `income_b` | yes      | Rupiah |                                              |
//! | `ptkp_b`   | yes      | PTKP   |                                              |
//!
//! ### Example
//!
//! ```csv
//! label,income_a,ptkp_a,income_b,ptkp_b
//! Budi & Sari,150.000.000,K/0,50.000.000,TK/0
//! Andi & Rina,100000000,TK/0,0,54000000
//! ```
use std::io::Write;
use std::path::Path;

use pph_core::{HouseholdComparison, Individual, PtkpTable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::{Exemption, ParseRupiahError, parse_rupiah};

// ---------------------------------------------------------------------------
// Serde-compatible rows that mirror the CSV layouts exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    label: Option<String>,
    income_a: String,
    ptkp_a: String,
    income_b: String,
    ptkp_b: String,
}

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    label: &'a str,
    income_a: Decimal,
    ptkp_a: Decimal,
    income_b: Decimal,
    ptkp_b: Decimal,
    separate_tax_a: Decimal,
    separate_tax_b: Decimal,
    combined_taxable_income: Decimal,
    combined_tax: Decimal,
    share_a: Decimal,
    share_b: Decimal,
    shortfall_a: Decimal,
    shortfall_b: Decimal,
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or writing household CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// Bad structure, missing required column, wrong column count, etc.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// An income cell is not a valid Rupiah amount. `row` is 1-based
    /// (header = row 0).
    #[error("invalid {column} on row {row}: {source}")]
    InvalidAmount {
        column: &'static str,
        row: usize,
        #[source]
        source: ParseRupiahError,
    },

    /// A PTKP cell is neither a status code nor an amount.
    #[error("invalid PTKP '{value}' on row {row}")]
    InvalidPtkp { value: String, row: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One household read from the batch file, with PTKP already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseholdInput {
    pub label: String,
    pub a: Individual,
    pub b: Individual,
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn parse_income(
    value: &str,
    column: &'static str,
    row: usize,
) -> Result<Decimal, CsvLoadError> {
    parse_rupiah(value).map_err(|source| CsvLoadError::InvalidAmount {
        column,
        row,
        source,
    })
}

fn parse_ptkp(
    value: String,
    row: usize,
    table: &PtkpTable,
) -> Result<Decimal, CsvLoadError> {
    value
        .parse::<Exemption>()
        .map(|exemption| exemption.resolve(table))
        .map_err(|_| CsvLoadError::InvalidPtkp { value, row })
}

/// Convert a single CSV row. `row_number` is 1-based.
fn convert_row(
    row: CsvRow,
    row_number: usize,
    table: &PtkpTable,
) -> Result<HouseholdInput, CsvLoadError> {
    let income_a = parse_income(&row.income_a, "income_a", row_number)?;
    let income_b = parse_income(&row.income_b, "income_b", row_number)?;
    let ptkp_a = parse_ptkp(row.ptkp_a, row_number, table)?;
    let ptkp_b = parse_ptkp(row.ptkp_b, row_number, table)?;

    Ok(HouseholdInput {
        label: row
            .label
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| format!("row {row_number}")),
        a: Individual::new(income_a, ptkp_a),
        b: Individual::new(income_b, ptkp_b),
    })
}

/// Parse CSV text and return the households in file order.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] – structurally invalid CSV or a missing column.
/// * [`CsvLoadError::InvalidAmount`] – an income cell cannot be parsed.
/// * [`CsvLoadError::InvalidPtkp`] – a PTKP cell is not a status or amount.
pub fn load_from_str(
    input: &str,
    table: &PtkpTable,
) -> Result<Vec<HouseholdInput>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| convert_row(result?, idx + 1, table))
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(
    path: &Path,
    table: &PtkpTable,
) -> Result<Vec<HouseholdInput>, CsvLoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents, table)
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Write one CSV row per household with every comparison figure.
pub fn write_results<W: Write>(
    writer: W,
    results: &[(String, HouseholdComparison)],
) -> Result<(), CsvLoadError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for (label, household) in results {
        csv_writer.serialize(ResultRow {
            label,
            income_a: household.a.gross_income,
            ptkp_a: household.a.exemption,
            income_b: household.b.gross_income,
            ptkp_b: household.b.exemption,
            separate_tax_a: household.separate.tax_a,
            separate_tax_b: household.separate.tax_b,
            combined_taxable_income: household.combined.combined_taxable_income,
            combined_tax: household.combined.combined_tax,
            share_a: household.combined.share_a,
            share_b: household.combined.share_b,
            shortfall_a: household.combined.shortfall_a,
            shortfall_b: household.combined.shortfall_b,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pph_core::simulate_household;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const MINIMAL_CSV: &str = "\
income_a,ptkp_a,income_b,ptkp_b
100000000,TK/0,0,TK/0
";

    const MULTI_ROW_CSV: &str = "\
label,income_a,ptkp_a,income_b,ptkp_b
Budi & Sari,150.000.000,K/0,50.000.000,TK/0
,100000000,54000000,0,Rp 54.000.000
Andi & Rina,Rp 300.000.000,K/3,120.000.000,tk0
";

    // -----------------------------------------------------------------------
    // 1. Minimal CSV
    // -----------------------------------------------------------------------
    #[test]
    fn test_minimal_csv_parses_required_fields() {
        let households =
            load_from_str(MINIMAL_CSV, &PtkpTable::default()).expect("should parse minimal CSV");

        assert_eq!(households.len(), 1);
        assert_eq!(
            households[0],
            HouseholdInput {
                label: "row 1".to_string(),
                a: Individual::new(dec!(100000000), dec!(54000000)),
                b: Individual::new(dec!(0), dec!(54000000)),
            }
        );
    }

    // -----------------------------------------------------------------------
    // 2. Multiple rows – order, labels, mixed PTKP forms
    // -----------------------------------------------------------------------
    #[test]
    fn test_multi_row_order_and_labels() {
        let households = load_from_str(MULTI_ROW_CSV, &PtkpTable::default()).expect("should parse");

        let labels: Vec<&str> = households.iter().map(|h| h.label.as_str()).collect();
        assert_eq!(labels, vec!["Budi & Sari", "row 2", "Andi & Rina"]);
    }

    #[test]
    fn test_multi_row_ptkp_forms_resolve() {
        let households = load_from_str(MULTI_ROW_CSV, &PtkpTable::default()).expect("should parse");

        assert_eq!(households[0].a.exemption, dec!(58500000));
        assert_eq!(households[0].b.exemption, dec!(54000000));
        assert_eq!(households[1].a.exemption, dec!(54000000));
        assert_eq!(households[1].b.exemption, dec!(54000000));
        assert_eq!(households[2].a.exemption, dec!(72000000));
        assert_eq!(households[2].a.gross_income, dec!(300000000));
        assert_eq!(households[2].b.gross_income, dec!(120000000));
    }

    #[test]
    fn test_custom_ptkp_table_applies() {
        let table = PtkpTable {
            base: dec!(60000000),
            ..PtkpTable::default()
        };

        let households = load_from_str(MINIMAL_CSV, &table).expect("should parse");

        assert_eq!(households[0].a.exemption, dec!(60000000));
    }

    // -----------------------------------------------------------------------
    // 3. Errors
    // -----------------------------------------------------------------------
    #[test]
    fn test_invalid_ptkp_reports_value_and_row() {
        let csv = "\
income_a,ptkp_a,income_b,ptkp_b
1,TK/0,1,TK/0
1,K/7,1,TK/0
";
        match load_from_str(csv, &PtkpTable::default()).unwrap_err() {
            CsvLoadError::InvalidPtkp { value, row } => {
                assert_eq!(value, "K/7");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidPtkp, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_income_reports_column_and_row() {
        let csv = "income_a,ptkp_a,income_b,ptkp_b\n1,TK/0,-5,TK/0\n";

        match load_from_str(csv, &PtkpTable::default()).unwrap_err() {
            CsvLoadError::InvalidAmount { column, row, .. } => {
                assert_eq!(column, "income_b");
                assert_eq!(row, 1);
            }
            other => panic!("expected InvalidAmount, got {:?}", other),
        }
    }

    #[test]
    fn test_income_above_maximum_is_row_error() {
        let csv = "income_a,ptkp_a,income_b,ptkp_b\n1,TK/0,1,TK/0\n10000000000000000000,TK/0,0,TK/0\n";

        match load_from_str(csv, &PtkpTable::default()).unwrap_err() {
            CsvLoadError::InvalidAmount {
                column,
                row,
                source: ParseRupiahError::OutOfRange(_),
            } => {
                assert_eq!(column, "income_a");
                assert_eq!(row, 2);
            }
            other => panic!("expected OutOfRange InvalidAmount, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_column_returns_parse_error() {
        let csv = "income_a,ptkp_a,income_b\n1,TK/0,1\n";

        assert!(matches!(
            load_from_str(csv, &PtkpTable::default()),
            Err(CsvLoadError::Parse(_))
        ));
    }

    #[test]
    fn test_header_only_returns_empty_vec() {
        let csv = "income_a,ptkp_a,income_b,ptkp_b\n";

        let households = load_from_str(csv, &PtkpTable::default()).expect("header-only is valid");

        assert!(households.is_empty());
    }

    // -----------------------------------------------------------------------
    // 4. Tolerance
    // -----------------------------------------------------------------------
    #[test]
    fn test_whitespace_and_column_order() {
        let csv = "\
ptkp_b , income_b , ptkp_a , income_a
TK/0 , 0 , K/1 , 80.000.000
";
        let households = load_from_str(csv, &PtkpTable::default()).expect("should parse");

        assert_eq!(households[0].a.gross_income, dec!(80000000));
        assert_eq!(households[0].a.exemption, dec!(63000000));
    }

    // -----------------------------------------------------------------------
    // 5. Writer
    // -----------------------------------------------------------------------
    #[test]
    fn test_write_results_emits_header_and_rows() {
        let household = simulate_household(
            Individual::new(dec!(100000000), dec!(54000000)),
            Individual::new(dec!(0), dec!(54000000)),
        );
        let mut out = Vec::new();

        write_results(&mut out, &[("Budi".to_string(), household)]).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "label,income_a,ptkp_a,income_b,ptkp_b,separate_tax_a,separate_tax_b,\
                 combined_taxable_income,combined_tax,share_a,share_b,shortfall_a,shortfall_b"
            )
        );
        assert_eq!(
            lines.next(),
            Some("Budi,100000000,54000000,0,54000000,2300000,0,0,0,0,0,-2300000,0")
        );
        assert_eq!(lines.next(), None);
    }
}
