//! Plain-text step-by-step explanations of a calculation.
//!
//! Every report is a [`fmt::Display`] value over already computed figures;
//! the figures come from [`pph_core`]. The free functions render them to a
//! `String`.

use std::fmt;

use pph_core::{HouseholdComparison, Individual, TaxBreakdown, compute_tax_breakdown};
use rust_decimal::Decimal;

use crate::config::Labels;
use crate::utils::{format_rate, format_rupiah};

const NO_TAX_OWED: &str = "PKP ≤ 0 → Tidak ada PPh terutang";

/// `5% × Rp 60.000.000 = Rp 3.000.000`, one line per touched layer.
fn write_tier_lines(
    f: &mut fmt::Formatter<'_>,
    breakdown: &TaxBreakdown,
) -> fmt::Result {
    if breakdown.no_tax_owed() {
        return writeln!(f, "{NO_TAX_OWED}");
    }

    for line in &breakdown.lines {
        writeln!(
            f,
            "{} × {} = {}",
            format_rate(line.rate),
            format_rupiah(line.taxed_amount),
            format_rupiah(line.tax)
        )?;
    }
    Ok(())
}

/// `Rp 3.000.000 + Rp 6.000.000`
fn tier_sum(breakdown: &TaxBreakdown) -> String {
    breakdown
        .lines
        .iter()
        .map(|line| format_rupiah(line.tax))
        .collect::<Vec<_>>()
        .join(" + ")
}

/// PPh 21 for one person filing separately.
pub struct SeparateDetail<'a> {
    pub label: &'a str,
    pub person: &'a Individual,
}

impl fmt::Display for SeparateDetail<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let pkp = self.person.taxable_income();
        let breakdown = compute_tax_breakdown(pkp);
        let income = format_rupiah(self.person.gross_income);
        let ptkp = format_rupiah(self.person.exemption);

        writeln!(f, "Detail PPh 21 {}\n", self.label)?;
        writeln!(f, "Step 1 – Penghasilan Neto\n{income}\n")?;
        writeln!(f, "Step 2 – PTKP\n{ptkp}\n")?;
        writeln!(
            f,
            "Step 3 – Penghitungan PKP\n\
             PKP = Penghasilan Neto − PTKP\n\
             PKP = {income} − {ptkp}\n\
             PKP = {}\n",
            format_rupiah(pkp)
        )?;

        // Within the first layer the step is a single multiplication; the total
        // below already shows it.
        writeln!(f, "Step 4 – Perhitungan Tarif Progresif")?;
        if breakdown.lines.len() != 1 {
            write_tier_lines(f, &breakdown)?;
        }
        writeln!(f)?;

        writeln!(f, "Total PPh 21 Setahun")?;
        let sum = tier_sum(&breakdown);
        if !sum.is_empty() {
            writeln!(f, "{sum}")?;
        }
        writeln!(f, "= {}", format_rupiah(breakdown.total))
    }
}

/// Combined (PH/MT) filing: pooled income, pooled PKP, progressive tax,
/// allocation by income share and the resulting shortfall per person.
///
/// Steps 4 to 6 only appear when the pooled PKP is positive.
pub struct CombinedDetail<'a> {
    pub household: &'a HouseholdComparison,
    pub labels: &'a Labels,
}

impl fmt::Display for CombinedDetail<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let Self { household, labels } = self;
        let combined = &household.combined;

        writeln!(f, "Penggabungan Penghasilan (PH/MT)\n")?;
        writeln!(
            f,
            "Step 1 – Penghasilan Digabung\n{}: {}\n{}: {}\nTotal: {}\n",
            labels.a,
            format_rupiah(household.a.gross_income),
            labels.b,
            format_rupiah(household.b.gross_income),
            format_rupiah(combined.total_income)
        )?;
        writeln!(
            f,
            "Step 2 – PTKP Digabung\n{}\n",
            format_rupiah(combined.total_exemption)
        )?;
        writeln!(
            f,
            "Step 3 – PKP Gabungan\n{}",
            format_rupiah(combined.combined_taxable_income)
        )?;

        if combined.combined_taxable_income <= Decimal::ZERO {
            return Ok(());
        }

        let breakdown = compute_tax_breakdown(combined.combined_taxable_income);
        writeln!(f, "\nStep 4 – Perhitungan Tarif Progresif")?;
        write_tier_lines(f, &breakdown)?;
        writeln!(
            f,
            "\nTotal PPh 21 Gabungan\n{} = {}\n",
            tier_sum(&breakdown),
            format_rupiah(combined.combined_tax)
        )?;
        writeln!(
            f,
            "Step 5 – Alokasi PPh ke {} & {}\nPPh {}: {}\nPPh {}: {}\n",
            labels.a,
            labels.b,
            labels.a,
            format_rupiah(combined.share_a),
            labels.b,
            format_rupiah(combined.share_b)
        )?;
        writeln!(
            f,
            "Step 6 – PPh Kurang / Lebih Bayar\n{}: {}\n{}: {}",
            labels.a,
            format_rupiah(combined.shortfall_a),
            labels.b,
            format_rupiah(combined.shortfall_b)
        )
    }
}

/// Separate tax vs PH/MT allocation side by side.
pub struct SummaryTable<'a> {
    pub household: &'a HouseholdComparison,
    pub labels: &'a Labels,
}

impl fmt::Display for SummaryTable<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let Self { household, labels } = self;
        let rows = [
            ("", labels.a.clone(), labels.b.clone()),
            (
                "PPh Terpisah",
                format_rupiah(household.separate.tax_a),
                format_rupiah(household.separate.tax_b),
            ),
            (
                "Alokasi PH/MT",
                format_rupiah(household.combined.share_a),
                format_rupiah(household.combined.share_b),
            ),
            (
                "Kurang/Lebih Bayar",
                format_rupiah(household.combined.shortfall_a),
                format_rupiah(household.combined.shortfall_b),
            ),
        ];

        let head = rows.iter().map(|r| r.0.chars().count()).max().unwrap_or(0);
        let col_a = rows.iter().map(|r| r.1.chars().count()).max().unwrap_or(0);
        let col_b = rows.iter().map(|r| r.2.chars().count()).max().unwrap_or(0);

        for (title, a, b) in &rows {
            writeln!(f, "{title:<head$}  {a:>col_a$}  {b:>col_b$}")?;
        }
        Ok(())
    }
}

pub fn separate_detail(
    label: &str,
    person: &Individual,
) -> String {
    SeparateDetail { label, person }.to_string()
}

pub fn combined_detail(
    household: &HouseholdComparison,
    labels: &Labels,
) -> String {
    CombinedDetail { household, labels }.to_string()
}

pub fn summary_table(
    household: &HouseholdComparison,
    labels: &Labels,
) -> String {
    SummaryTable { household, labels }.to_string()
}
