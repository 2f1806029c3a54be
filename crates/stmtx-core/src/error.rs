//! Error types for the stmtx-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the stmtx library.
#[derive(Error, Debug)]
pub enum StmtxError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// No statement files were found in the folder or its immediate subfolders.
    #[error("no statement files found in {}", .0.display())]
    NoStatements(PathBuf),

    /// The statement's file name carries no `YYYYMMDD` date, so transaction years are unknown.
    #[error("no statement date in file name {0}")]
    UndatedStatement(String),

    /// Every file was processed but none produced a transaction.
    #[error("no transactions found in {files} statement file(s)")]
    NoTransactions { files: usize },

    /// Report writing error.
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors raised while rendering the report tables.
#[derive(Error, Debug)]
pub enum ReportError {
    /// CSV serialization failed.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for the stmtx library.
pub type Result<T> = std::result::Result<T, StmtxError>;
