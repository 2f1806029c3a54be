//! Line-oriented parser for the transaction section of a Chase statement.

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::models::config::ParserConfig;
use crate::models::transaction::TransactionRecord;

use super::rules::{
    amount_and_balance, extract_description, match_leading_date, resolve_transaction_year,
    FieldExtractor, MoneyExtractor,
};
use super::StatementParser;

/// Position of the parser relative to the transaction section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    /// Header and summary content before the section marker.
    BeforeSection,
    /// Inside the itemized transaction listing.
    InSection,
}

/// What the section tracker decided about a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// The section marker itself.
    Marker,
    /// Content outside the section.
    Outside,
    /// A balance carry-forward inside the section.
    CarryForward,
    /// A line that may hold a transaction.
    Candidate,
}

/// Two-state tracker that finds the transaction section in statement text.
#[derive(Debug, Clone)]
pub struct SectionTracker<'a> {
    state: SectionState,
    section_marker: &'a str,
    skip_marker: &'a str,
}

impl<'a> SectionTracker<'a> {
    pub fn new(section_marker: &'a str, skip_marker: &'a str) -> Self {
        Self {
            state: SectionState::BeforeSection,
            section_marker,
            skip_marker,
        }
    }

    pub fn state(&self) -> SectionState {
        self.state
    }

    /// Classify the next line, advancing the state on the section marker.
    pub fn classify(&mut self, line: &str) -> LineKind {
        if line.contains(self.section_marker) {
            self.state = SectionState::InSection;
            return LineKind::Marker;
        }

        match self.state {
            SectionState::BeforeSection => LineKind::Outside,
            SectionState::InSection if line.contains(self.skip_marker) => LineKind::CarryForward,
            SectionState::InSection => LineKind::Candidate,
        }
    }
}

/// Fields read from a single transaction line, before year resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// The leading `MM/DD` token.
    pub month_day: String,
    pub description: String,
    pub amount: Decimal,
    pub balance: Decimal,
    /// The line with surrounding whitespace removed.
    pub original_line: String,
}

/// Read one candidate line as a transaction.
///
/// Returns `None` when the line does not start with `MM/DD` or carries fewer than
/// two monetary tokens.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let trimmed = line.trim();
    let month_day = match_leading_date(trimmed)?;

    let tokens = MoneyExtractor::new().extract_all(line);
    let (amount, balance) = amount_and_balance(&tokens)?;

    Some(ParsedLine {
        month_day: month_day.to_string(),
        description: extract_description(line, month_day, &amount.source),
        amount: amount.value,
        balance: balance.value,
        original_line: trimmed.to_string(),
    })
}

/// Chase checking statement parser.
#[derive(Debug, Clone, Default)]
pub struct TransactionParser {
    config: ParserConfig,
}

impl TransactionParser {
    /// Create a parser with the standard Chase markers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser from configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Set the marker that opens the transaction section.
    pub fn with_section_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.section_marker = marker.into();
        self
    }

    /// Set the marker of carry-forward lines skipped inside the section.
    pub fn with_skip_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.skip_marker = marker.into();
        self
    }

    fn to_record(
        &self,
        parsed: ParsedLine,
        source_file: &str,
        statement_date: &str,
    ) -> Option<TransactionRecord> {
        let year = resolve_transaction_year(&parsed.month_day, statement_date)?;

        Some(TransactionRecord {
            statement_date: statement_date.to_string(),
            date: format!("{}/{}", parsed.month_day, year),
            description: parsed.description,
            amount: parsed.amount,
            balance: parsed.balance,
            original_line: parsed.original_line,
            source_file: source_file.to_string(),
            statement_sequence: None,
        })
    }
}

impl StatementParser for TransactionParser {
    fn parse_text(
        &self,
        text: &str,
        source_file: &str,
        statement_date: &str,
    ) -> Vec<TransactionRecord> {
        let mut tracker = SectionTracker::new(&self.config.section_marker, &self.config.skip_marker);
        let mut records = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            if tracker.classify(line) != LineKind::Candidate {
                continue;
            }

            match parse_line(line).and_then(|p| self.to_record(p, source_file, statement_date)) {
                Some(record) => records.push(record),
                None => trace!("{}:{}: skipped line {:?}", source_file, line_no + 1, line),
            }
        }

        if tracker.state() == SectionState::BeforeSection {
            debug!("{}: no \"{}\" section found", source_file, self.config.section_marker);
        }

        debug!("{}: parsed {} transactions", source_file, records.len());
        records
    }
}
