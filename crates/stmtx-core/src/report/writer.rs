//! CSV/JSON rendering of the transaction and verification tables.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::ReportError;
use crate::models::config::ReportConfig;
use crate::models::transaction::TransactionRecord;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Full transaction table row; sort and sequence helpers are left out.
#[derive(Debug, Serialize)]
struct TransactionRow<'a> {
    #[serde(rename = "Statement_Date")]
    statement_date: &'a str,
    #[serde(rename = "Date")]
    date: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Amount")]
    amount: Decimal,
    #[serde(rename = "Balance")]
    balance: Decimal,
    #[serde(rename = "Original_Line")]
    original_line: &'a str,
    #[serde(rename = "Source_File")]
    source_file: &'a str,
}

/// Verification table row, for auditing against the statement text.
#[derive(Debug, Serialize)]
struct VerificationRow<'a> {
    #[serde(rename = "Statement_Date")]
    statement_date: &'a str,
    #[serde(rename = "Date")]
    date: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Amount")]
    amount: Decimal,
    #[serde(rename = "Original_Line")]
    original_line: &'a str,
}

/// Write the full transaction table as CSV.
pub fn write_transactions<W: Write>(records: &[TransactionRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in records {
        wtr.serialize(TransactionRow {
            statement_date: &r.statement_date,
            date: &r.date,
            description: &r.description,
            amount: r.amount,
            balance: r.balance,
            original_line: &r.original_line,
            source_file: &r.source_file,
        })?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write the verification table as CSV.
pub fn write_verification<W: Write>(records: &[TransactionRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in records {
        wtr.serialize(VerificationRow {
            statement_date: &r.statement_date,
            date: &r.date,
            description: &r.description,
            amount: r.amount,
            original_line: &r.original_line,
        })?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Files produced by a report run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub transactions: PathBuf,
    pub verification: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

/// Writes report files named `<folder>_<suffix>_<timestamp>_*`.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    stem: String,
    write_verification: bool,
    write_json: bool,
}

impl ReportWriter {
    /// Create a writer for a statement folder.
    ///
    /// Reports go to `config.output_dir` when set, otherwise into `folder` itself.
    pub fn new(folder: &Path, config: &ReportConfig, timestamp: NaiveDateTime) -> Self {
        let folder_name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "statements".to_string());
        let stem = format!(
            "{}_{}_{}",
            folder_name,
            config.file_stem_suffix,
            timestamp.format("%Y%m%d_%H%M%S")
        );

        Self {
            output_dir: config.output_dir.clone().unwrap_or_else(|| folder.to_path_buf()),
            stem,
            write_verification: config.write_verification,
            write_json: config.write_json,
        }
    }

    /// Override the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Enable or disable the JSON export.
    pub fn with_json(mut self, enabled: bool) -> Self {
        self.write_json = enabled;
        self
    }

    /// File name stem shared by every report file.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    fn path_for(&self, suffix: &str) -> PathBuf {
        self.output_dir.join(format!("{}{}", self.stem, suffix))
    }

    /// Write every enabled report file.
    pub fn write(&self, records: &[TransactionRecord]) -> Result<ReportPaths> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| ReportError::Write {
            path: self.output_dir.clone(),
            source,
        })?;

        let transactions = self.path_for("_transactions.csv");
        write_transactions(records, create(&transactions)?)?;
        debug!("Wrote {} rows to {}", records.len(), transactions.display());

        let verification = if self.write_verification {
            let path = self.path_for("_verification.csv");
            write_verification(records, create(&path)?)?;
            debug!("Wrote verification table to {}", path.display());
            Some(path)
        } else {
            None
        };

        let json = if self.write_json {
            let path = self.path_for(".json");
            let mut out = create(&path)?;
            serde_json::to_writer_pretty(&mut out, records)?;
            out.flush().map_err(|source| ReportError::Write {
                path: path.clone(),
                source,
            })?;
            debug!("Wrote JSON export to {}", path.display());
            Some(path)
        } else {
            None
        };

        Ok(ReportPaths {
            transactions,
            verification,
            json,
        })
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })
}
