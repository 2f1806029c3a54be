//! Report tables and summary built from the final record set.

mod summary;
mod writer;

pub use summary::{format_usd, MonthlyTotal, Summary};
pub use writer::{write_transactions, write_verification, ReportPaths, ReportWriter};
