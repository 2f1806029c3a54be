//! Transaction extraction from statement text.

mod parser;
pub mod rules;

pub use parser::{parse_line, LineKind, ParsedLine, SectionState, SectionTracker, TransactionParser};

use crate::models::transaction::{StatementFile, TransactionRecord};

/// Trait for statement text parsers.
///
/// Parsing is best-effort: unreadable lines are dropped, never reported.
pub trait StatementParser {
    /// Parse the full text of one statement, in line order.
    fn parse_text(&self, text: &str, source_file: &str, statement_date: &str)
        -> Vec<TransactionRecord>;

    /// Parse the text of a discovered statement file.
    fn parse(&self, text: &str, statement: &StatementFile) -> Vec<TransactionRecord> {
        self.parse_text(text, &statement.filename, &statement.statement_date)
    }
}
