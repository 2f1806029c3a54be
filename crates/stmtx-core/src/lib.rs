//! Core library for Chase bank statement processing.
//!
//! This crate provides:
//! - PDF text extraction (per page, via lopdf and pdf-extract)
//! - Transaction line parsing with statement-date and year-rollover resolution
//! - Batch orchestration over a folder of statements
//! - Report tables (full and verification views) and a financial summary

pub mod batch;
pub mod error;
pub mod models;
pub mod pdf;
pub mod report;
pub mod statement;

pub use batch::{
    run_batch, BatchContext, BatchOutcome, FileFailure, Notifier, StatementSource, TracingNotifier,
};
pub use error::{PdfError, ReportError, Result, StmtxError};
pub use models::config::StmtxConfig;
pub use models::transaction::{StatementFile, TransactionRecord};
pub use pdf::{PdfExtractor, PdfPageSource};
pub use report::{ReportPaths, ReportWriter, Summary};
pub use statement::{StatementParser, TransactionParser};
