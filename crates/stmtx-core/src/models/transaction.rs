//! Statement and transaction data models.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::statement::rules::dates::resolve_statement_date;
use crate::statement::rules::patterns::ISO_DATE;

/// Format of the composed transaction date.
pub const TRANSACTION_DATE_FORMAT: &str = "%m/%d/%Y";

/// A statement file discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementFile {
    /// Full path to the file.
    pub path: PathBuf,

    /// File name without directory.
    pub filename: String,

    /// `YYYY-MM-DD` from the file name, or the file name itself when it carries no date.
    pub statement_date: String,
}

impl StatementFile {
    /// Build a statement file entry, resolving its statement date from the file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let statement_date = resolve_statement_date(&filename);

        Self {
            path,
            filename,
            statement_date,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the statement date is `YYYY-MM-DD` rather than the file name fallback.
    pub fn is_dated(&self) -> bool {
        ISO_DATE.is_match(&self.statement_date)
    }
}

/// A single transaction line recovered from a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Statement date of the source file (`YYYY-MM-DD` or file name fallback).
    pub statement_date: String,

    /// Full transaction date, `MM/DD/YYYY`.
    pub date: String,

    /// Description text between the date and the amount.
    pub description: String,

    /// Signed transaction amount.
    pub amount: Decimal,

    /// Running balance after the transaction.
    pub balance: Decimal,

    /// The trimmed source line, kept for manual verification.
    pub original_line: String,

    /// File name of the statement the line came from.
    pub source_file: String,

    /// 1-based position within the statement, assigned by the batch orchestrator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement_sequence: Option<u32>,
}

impl TransactionRecord {
    /// Annotate the record with its position within the statement.
    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.statement_sequence = Some(sequence);
        self
    }

    /// Parsed transaction date, if `date` is a valid calendar date.
    pub fn transaction_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, TRANSACTION_DATE_FORMAT).ok()
    }

    /// `YYYY-MM` bucket used by the monthly summary.
    pub fn month_key(&self) -> Option<String> {
        self.transaction_date().map(|d| d.format("%Y-%m").to_string())
    }

    /// Whether the amount is a credit (money in).
    pub fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Whether the amount is a debit (money out).
    pub fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}
