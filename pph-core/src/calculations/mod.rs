//! PPh 21 calculation modules.
//!
//! [`progressive`] walks the bracket schedule; [`allocation`] composes it into
//! separate and combined (PH/MT) filings for a two-person household.

pub mod allocation;
pub mod common;
pub mod progressive;

pub use allocation::{compute_combined_allocation, compute_separate, simulate_household};
pub use progressive::{BracketScheduleError, BracketTaxEngine, compute_tax, compute_tax_breakdown};
