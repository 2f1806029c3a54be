//! Batch orchestration over a folder of statements.
//!
//! The orchestrator is the only place that decides whether a failure is recoverable:
//! a statement that cannot be read is logged and skipped, while an empty folder or a
//! batch without a single transaction ends the run.

mod discovery;

pub use discovery::{discover_statements, list_statement_files, sort_statements};

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, StmtxError};
use crate::models::config::DiscoveryConfig;
use crate::models::transaction::{StatementFile, TransactionRecord};
use crate::pdf::join_pages;
use crate::report::Summary;
use crate::statement::StatementParser;

/// Supplies the text of a statement, one entry per page.
pub trait StatementSource {
    fn page_texts(&self, statement: &StatementFile) -> Result<Vec<String>>;
}

/// Receives progress and failure notices from the orchestrator.
pub trait Notifier {
    /// A statement is about to be processed (`index` is 0-based).
    fn statement_started(&self, index: usize, total: usize, statement: &StatementFile);

    /// A statement was parsed.
    fn statement_finished(&self, statement: &StatementFile, transactions: usize);

    /// A statement could not be read and was skipped.
    fn statement_failed(&self, statement: &StatementFile, error: &StmtxError);
}

/// Notifier that only writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn statement_started(&self, index: usize, total: usize, statement: &StatementFile) {
        info!(
            "Processing {}/{}: {} (Statement Date: {})",
            index + 1,
            total,
            statement.filename,
            statement.statement_date
        );
    }

    fn statement_finished(&self, statement: &StatementFile, transactions: usize) {
        info!("Found {} transactions in {}", transactions, statement.filename);
    }

    fn statement_failed(&self, statement: &StatementFile, error: &StmtxError) {
        warn!("Error processing {}: {}", statement.filename, error);
    }
}

/// A statement that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub statement: StatementFile,
    pub error: String,
}

/// State of one batch run: target folder, discovered statements and what they produced.
#[derive(Debug, Clone)]
pub struct BatchContext {
    directory: PathBuf,
    statements: Vec<StatementFile>,
    records: Vec<TransactionRecord>,
    failures: Vec<FileFailure>,
}

impl BatchContext {
    /// Discover statements under `dir`.
    pub fn discover(dir: &Path, config: &DiscoveryConfig) -> Result<Self> {
        let (directory, statements) = discover_statements(dir, config)?;
        Ok(Self::new(directory, statements))
    }

    /// Build a context from already-known statements, ordering them by statement date.
    pub fn new(directory: impl Into<PathBuf>, statements: Vec<StatementFile>) -> Self {
        Self {
            directory: directory.into(),
            statements: sort_statements(statements),
            records: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Folder the statements were found in.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn statements(&self) -> &[StatementFile] {
        &self.statements
    }

    /// Extract and parse every statement in order, skipping those that fail.
    pub fn process<S, P, N>(&mut self, source: &S, parser: &P, notifier: &N)
    where
        S: StatementSource + ?Sized,
        P: StatementParser + ?Sized,
        N: Notifier + ?Sized,
    {
        let total = self.statements.len();

        for (index, statement) in self.statements.iter().enumerate() {
            notifier.statement_started(index, total, statement);

            let pages = if statement.is_dated() {
                source.page_texts(statement)
            } else {
                Err(StmtxError::UndatedStatement(statement.filename.clone()))
            };

            let pages = match pages {
                Ok(pages) => pages,
                Err(e) => {
                    notifier.statement_failed(statement, &e);
                    self.failures.push(FileFailure {
                        statement: statement.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let text = join_pages(&pages);
            let parsed = parser.parse(&text, statement);
            notifier.statement_finished(statement, parsed.len());

            self.records.extend(
                parsed
                    .into_iter()
                    .zip(1u32..)
                    .map(|(record, sequence)| record.with_sequence(sequence)),
            );
        }

        debug!(
            "Processed {} statements: {} records, {} failures",
            total,
            self.records.len(),
            self.failures.len()
        );
    }

    /// Order all records by transaction date and statement sequence.
    ///
    /// Fails with [`StmtxError::NoTransactions`] when nothing was extracted.
    pub fn finish(self) -> Result<BatchOutcome> {
        if self.records.is_empty() {
            return Err(StmtxError::NoTransactions {
                files: self.statements.len(),
            });
        }

        let mut records = self.records;
        records.sort_by(compare_records);

        Ok(BatchOutcome {
            directory: self.directory,
            statements: self.statements,
            records,
            failures: self.failures,
        })
    }
}

/// Final ordering: transaction date, then position within the statement.
///
/// Records whose date is not a real calendar day sort after all others. The sort
/// using this is stable, so equal keys keep statement order.
pub fn compare_records(a: &TransactionRecord, b: &TransactionRecord) -> Ordering {
    let key = |r: &TransactionRecord| {
        let date = r.transaction_date();
        (date.is_none(), date, r.statement_sequence)
    };
    key(a).cmp(&key(b))
}

/// Result of a completed batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Folder the statements were read from.
    pub directory: PathBuf,
    /// All statements attempted, in processing order.
    pub statements: Vec<StatementFile>,
    /// All records in final order.
    pub records: Vec<TransactionRecord>,
    /// Statements that were skipped.
    pub failures: Vec<FileFailure>,
}

impl BatchOutcome {
    /// Financial summary over the final record set.
    pub fn summary(&self) -> Summary {
        Summary::from_records(self.statements.len(), &self.records)
    }
}

/// Discover, extract, parse and order every statement under `dir`.
pub fn run_batch<S, P, N>(
    dir: &Path,
    config: &DiscoveryConfig,
    source: &S,
    parser: &P,
    notifier: &N,
) -> Result<BatchOutcome>
where
    S: StatementSource + ?Sized,
    P: StatementParser + ?Sized,
    N: Notifier + ?Sized,
{
    let mut context = BatchContext::discover(dir, config)?;
    info!(
        "Processing {} statements from {}",
        context.statements().len(),
        context.directory().display()
    );

    context.process(source, parser, notifier);
    context.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::TransactionParser;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    struct MemorySource(HashMap<String, Vec<String>>);

    impl StatementSource for MemorySource {
        fn page_texts(&self, statement: &StatementFile) -> Result<Vec<String>> {
            self.0
                .get(&statement.filename)
                .cloned()
                .ok_or_else(|| StmtxError::Config(format!("unreadable {}", statement.filename)))
        }
    }

    fn source(entries: &[(&str, &[&str])]) -> MemorySource {
        MemorySource(
            entries
                .iter()
                .map(|(name, pages)| {
                    (name.to_string(), pages.iter().map(|p| p.to_string()).collect())
                })
                .collect(),
        )
    }

    fn context(names: &[&str]) -> BatchContext {
        BatchContext::new(
            "/statements",
            names
                .iter()
                .map(|n| StatementFile::from_path(format!("/statements/{}", n)))
                .collect(),
        )
    }

    #[test]
    fn test_sequences_are_per_statement() {
        let src = source(&[(
            "20240301.pdf",
            &["TRANSACTION DETAIL\n03/02 A -1.00 9.00", "03/03 B -1.00 8.00\n03/04 C -1.00 7.00"],
        )]);
        let mut ctx = context(&["20240301.pdf"]);
        ctx.process(&src, &TransactionParser::new(), &TracingNotifier);
        let outcome = ctx.finish().unwrap();

        let seqs: Vec<_> = outcome.records.iter().map(|r| r.statement_sequence).collect();
        assert_eq!(seqs, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_pages_are_joined_with_newline() {
        // Without the separator "7.00" and "03/04" would merge into one line
        let src = source(&[("20240301.pdf", &["TRANSACTION DETAIL\n03/03 B -1.00 7.00", "03/04 C -1.00 6.00"])]);
        let mut ctx = context(&["20240301.pdf"]);
        ctx.process(&src, &TransactionParser::new(), &TracingNotifier);
        assert_eq!(ctx.finish().unwrap().records.len(), 2);
    }

    #[test]
    fn test_failing_statement_is_skipped() {
        let src = source(&[
            ("20240201.pdf", &["TRANSACTION DETAIL\n02/02 A -1.00 9.00"]),
            ("20240401.pdf", &["TRANSACTION DETAIL\n04/02 C -1.00 7.00"]),
        ]);
        let mut ctx = context(&["20240201.pdf", "20240301.pdf", "20240401.pdf"]);
        ctx.process(&src, &TransactionParser::new(), &TracingNotifier);
        let outcome = ctx.finish().unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].statement.filename, "20240301.pdf");
        assert_eq!(outcome.statements.len(), 3);
    }

    #[test]
    fn test_undated_statement_is_reported_as_failure() {
        let src = source(&[
            ("march.pdf", &["TRANSACTION DETAIL\n03/02 A -1.00 9.00"]),
            ("20240401.pdf", &["TRANSACTION DETAIL\n04/02 B -1.00 8.00"]),
        ]);
        let mut ctx = context(&["march.pdf", "20240401.pdf"]);
        ctx.process(&src, &TransactionParser::new(), &TracingNotifier);
        let outcome = ctx.finish().unwrap();

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].description, "B");
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].statement.filename, "march.pdf");
        assert!(outcome.failures[0].error.contains("no statement date"));
    }

    #[test]
    fn test_no_transactions_is_an_error() {
        let src = source(&[("20240201.pdf", &["no section here"])]);
        let mut ctx = context(&["20240201.pdf"]);
        ctx.process(&src, &TransactionParser::new(), &TracingNotifier);
        assert!(matches!(ctx.finish(), Err(StmtxError::NoTransactions { files: 1 })));
    }

    #[test]
    fn test_global_order_by_date_then_sequence() {
        // The March statement carries a late-February line that must sort first
        let src = source(&[
            ("20240301.pdf", &["TRANSACTION DETAIL\n02/28 LATE -1.00 9.00\n03/01 X -1.00 8.00"]),
            ("20240201.pdf", &["TRANSACTION DETAIL\n02/01 FIRST -1.00 10.00\n02/28 SAME -2.00 8.00"]),
        ]);
        let mut ctx = context(&["20240301.pdf", "20240201.pdf"]);
        ctx.process(&src, &TransactionParser::new(), &TracingNotifier);
        let outcome = ctx.finish().unwrap();

        let order: Vec<(&str, Option<u32>)> = outcome
            .records
            .iter()
            .map(|r| (r.description.as_str(), r.statement_sequence))
            .collect();
        assert_eq!(
            order,
            vec![
                ("FIRST", Some(1)),
                ("LATE", Some(1)),
                ("SAME", Some(2)),
                ("X", Some(2)),
            ]
        );
    }

    #[test]
    fn test_invalid_calendar_dates_sort_last() {
        let src = source(&[("20240301.pdf", &["TRANSACTION DETAIL\n02/30 ODD -1.00 9.00\n03/01 X -1.00 8.00"])]);
        let mut ctx = context(&["20240301.pdf"]);
        ctx.process(&src, &TransactionParser::new(), &TracingNotifier);
        let outcome = ctx.finish().unwrap();
        assert_eq!(outcome.records[0].description, "X");
        assert_eq!(outcome.records[1].description, "ODD");
    }
}
