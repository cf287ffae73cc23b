//! Glue between parsed command-line input and the engine.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use pph_core::{HouseholdComparison, Individual, simulate_household};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::csv_loader;
use crate::report;
use crate::utils::Exemption;

/// Income and PTKP for one household member as entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberInput {
    pub income: Decimal,
    pub ptkp: Exemption,
}

impl MemberInput {
    pub fn to_individual(
        self,
        config: &AppConfig,
    ) -> Individual {
        Individual::new(self.income, self.ptkp.resolve(&config.ptkp))
    }
}

/// Resolves both members and runs the separate vs PH/MT comparison.
pub fn household(
    a: MemberInput,
    b: MemberInput,
    config: &AppConfig,
) -> HouseholdComparison {
    let a = a.to_individual(config);
    let b = b.to_individual(config);
    debug!(
        income_a = %a.gross_income,
        ptkp_a = %a.exemption,
        income_b = %b.gross_income,
        ptkp_b = %b.exemption,
        "simulating household"
    );
    simulate_household(a, b)
}

/// Separate detail for both members, the PH/MT walkthrough and the summary.
pub fn household_report(
    household: &HouseholdComparison,
    config: &AppConfig,
) -> String {
    let labels = &config.labels;
    [
        report::separate_detail(&labels.a, &household.a),
        report::separate_detail(&labels.b, &household.b),
        report::combined_detail(household, labels),
        report::summary_table(household, labels),
    ]
    .join("\n")
}

/// Runs every household in `input` and writes the result CSV to `output`,
/// or stdout when none is given. Returns the number of households.
pub fn run_batch(
    input: &Path,
    output: Option<&Path>,
    config: &AppConfig,
) -> Result<usize> {
    let households = csv_loader::load_from_file(input, &config.ptkp)
        .with_context(|| format!("failed to load households from '{}'", input.display()))?;
    info!(count = households.len(), file = %input.display(), "loaded households");
    if households.is_empty() {
        warn!(file = %input.display(), "batch file has no household rows");
    }

    let results: Vec<_> = households
        .into_iter()
        .map(|h| (h.label, simulate_household(h.a, h.b)))
        .collect();

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("cannot create '{}'", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    csv_loader::write_results(writer, &results).context("failed to write results")?;

    if let Some(path) = output {
        info!(file = %path.display(), "results written");
    }
    Ok(results.len())
}
