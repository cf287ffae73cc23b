pub mod calculations;
pub mod models;

pub use calculations::{
    BracketScheduleError, BracketTaxEngine, compute_combined_allocation, compute_separate,
    compute_tax, compute_tax_breakdown, simulate_household,
};
pub use models::*;
