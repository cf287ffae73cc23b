use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;

use pph_cli::app::{self, MemberInput};
use pph_cli::config::AppConfig;
use pph_cli::logging::init_logging;
use pph_cli::report;
use pph_cli::utils::{Exemption, format_rupiah, parse_rupiah};
use pph_core::Individual;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Indonesian PPh 21 calculator with separate vs PH/MT household comparison.
///
/// Amounts accept `100000000`, `100.000.000` or `Rp 100.000.000`. A PTKP is
/// either a status code (`TK/0`..`TK/3`, `K/0`..`K/3`) or an amount.
#[derive(Debug, Parser)]
#[command(name = "pph21")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter directive (e.g. `debug`, `pph_core=trace`). RUST_LOG wins.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append logs to this file as well as stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print separate taxes, PH/MT allocation and shortfall as a table.
    Calc(HouseholdArgs),

    /// Step-by-step PPh 21 for a single person.
    Detail {
        /// Annual net income.
        #[arg(value_parser = parse_rupiah)]
        income: Decimal,

        /// PTKP status code or amount.
        #[arg(short, long, default_value = "TK/0")]
        ptkp: Exemption,

        /// Name shown in the report.
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Full walkthrough: both separate details, the PH/MT steps and the table.
    Phmt(HouseholdArgs),

    /// Run a CSV of households and write one result row per household.
    Batch {
        /// Input CSV (`label,income_a,ptkp_a,income_b,ptkp_b`).
        file: PathBuf,

        /// Output CSV; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct HouseholdArgs {
    /// Annual net income of the first member.
    #[arg(long, value_parser = parse_rupiah)]
    income_a: Decimal,

    /// PTKP of the first member.
    #[arg(long, default_value = "K/0")]
    ptkp_a: Exemption,

    /// Annual net income of the second member.
    #[arg(long, value_parser = parse_rupiah, default_value = "0")]
    income_b: Decimal,

    /// PTKP of the second member.
    #[arg(long, default_value = "TK/0")]
    ptkp_b: Exemption,
}

impl HouseholdArgs {
    fn members(&self) -> (MemberInput, MemberInput) {
        (
            MemberInput {
                income: self.income_a,
                ptkp: self.ptkp_a,
            },
            MemberInput {
                income: self.income_b,
                ptkp: self.ptkp_b,
            },
        )
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load config '{}'", path.display()))?,
        None => AppConfig::default(),
    };
    Ok(config.with_overrides(cli.log_level.clone(), cli.log_file.clone()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    init_logging(&config.logging)?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Command::Calc(args) => {
            let (a, b) = args.members();
            let household = app::household(a, b, &config);
            print!("{}", report::summary_table(&household, &config.labels));
        }
        Command::Detail {
            income,
            ptkp,
            label,
        } => {
            let person = Individual::new(income, ptkp.resolve(&config.ptkp));
            let label = label.unwrap_or_else(|| config.labels.a.clone());
            print!("{}", report::separate_detail(&label, &person));
        }
        Command::Phmt(args) => {
            let (a, b) = args.members();
            let household = app::household(a, b, &config);
            print!("{}", app::household_report(&household, &config));
            debug!(
                combined_tax = %format_rupiah(household.combined.combined_tax),
                "PH/MT walkthrough printed"
            );
        }
        Command::Batch { file, output } => {
            let count = app::run_batch(&file, output.as_deref(), &config)?;
            eprintln!("Processed {count} households.");
        }
    }

    Ok(())
}
