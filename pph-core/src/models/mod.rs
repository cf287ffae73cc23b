mod allocation;
mod individual;
mod ptkp;
mod tax_bracket;

pub use allocation::{AllocationResult, HouseholdComparison, SeparateTaxes};
pub use individual::Individual;
pub use ptkp::{PtkpStatus, PtkpStatusError, PtkpTable};
pub use tax_bracket::{BracketLine, PPH21_BRACKETS, TaxBracket, TaxBreakdown};
