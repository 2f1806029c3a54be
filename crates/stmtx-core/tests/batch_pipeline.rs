//! End-to-end batch runs over a folder of statements with in-memory page text.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use stmtx_core::models::config::DiscoveryConfig;
use stmtx_core::{
    run_batch, Notifier, StatementFile, StatementSource, StmtxError, TransactionParser,
    TransactionRecord,
};

/// Serves page text by file name; unknown files fail like an unreadable PDF.
struct FixtureSource {
    pages: HashMap<&'static str, Vec<&'static str>>,
}

impl StatementSource for FixtureSource {
    fn page_texts(&self, statement: &StatementFile) -> stmtx_core::Result<Vec<String>> {
        match self.pages.get(statement.filename.as_str()) {
            Some(pages) => Ok(pages.iter().map(|p| p.to_string()).collect()),
            None => Err(stmtx_core::PdfError::Parse("corrupt xref table".to_string()).into()),
        }
    }
}

#[derive(Default)]
struct RecordingNotifier {
    events: RefCell<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn statement_started(&self, index: usize, total: usize, statement: &StatementFile) {
        self.events
            .borrow_mut()
            .push(format!("start {}/{} {}", index + 1, total, statement.filename));
    }

    fn statement_finished(&self, statement: &StatementFile, transactions: usize) {
        self.events
            .borrow_mut()
            .push(format!("done {} {}", statement.filename, transactions));
    }

    fn statement_failed(&self, statement: &StatementFile, _error: &StmtxError) {
        self.events
            .borrow_mut()
            .push(format!("failed {}", statement.filename));
    }
}

const DECEMBER: &str = "\
CHECKING SUMMARY
12/01 Deposits and Additions 1,000.00 1,000.00
TRANSACTION DETAIL
DATE DESCRIPTION AMOUNT BALANCE
Beginning Balance $500.00
11/28 Card Purchase 11/27 Grocery Store -52.10 447.90
12/02 Payroll Acme Inc 1,000.00 1,447.90
12/05 Zelle Payment To Landlord -900.00 547.90
";

const JANUARY_PAGE_1: &str = "\
TRANSACTION DETAIL
Beginning Balance $547.90
12/29 Card Purchase Coffee -4.50 543.40
12/31 Interest Payment 0.12 543.52";

const JANUARY_PAGE_2: &str = "\
Page 2 of 2
01/02 Payroll Acme Inc 1,000.00 1,543.52
01/03 Pending authorization 12.00
Ending Balance $1,543.52";

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"%PDF-1.4").unwrap();
}

fn fixture_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "20250115-statements-1234-.pdf");
    touch(dir.path(), "20241215-statements-1234-.pdf");
    touch(dir.path(), "20241115-statements-1234-.pdf");
    dir
}

fn fixture_source() -> FixtureSource {
    let mut pages = HashMap::new();
    pages.insert("20241215-statements-1234-.pdf", vec![DECEMBER]);
    pages.insert(
        "20250115-statements-1234-.pdf",
        vec![JANUARY_PAGE_1, JANUARY_PAGE_2],
    );
    // 20241115 is missing on purpose: it fails extraction
    FixtureSource { pages }
}

fn dates(records: &[TransactionRecord]) -> Vec<&str> {
    records.iter().map(|r| r.date.as_str()).collect()
}

#[test]
fn test_batch_over_folder() {
    let dir = fixture_dir();
    let notifier = RecordingNotifier::default();

    let outcome = run_batch(
        dir.path(),
        &DiscoveryConfig::default(),
        &fixture_source(),
        &TransactionParser::new(),
        &notifier,
    )
    .unwrap();

    assert_eq!(
        dates(&outcome.records),
        vec![
            "11/28/2024",
            "12/02/2024",
            "12/05/2024",
            "12/29/2024",
            "12/31/2024",
            "01/02/2025",
        ]
    );

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].statement.filename, "20241115-statements-1234-.pdf");
    assert!(outcome.failures[0].error.contains("corrupt xref table"));

    assert_eq!(
        *notifier.events.borrow(),
        vec![
            "start 1/3 20241115-statements-1234-.pdf",
            "failed 20241115-statements-1234-.pdf",
            "start 2/3 20241215-statements-1234-.pdf",
            "done 20241215-statements-1234-.pdf 3",
            "start 3/3 20250115-statements-1234-.pdf",
            "done 20250115-statements-1234-.pdf 3",
        ]
    );
}

#[test]
fn test_records_carry_statement_context() {
    let dir = fixture_dir();
    let outcome = run_batch(
        dir.path(),
        &DiscoveryConfig::default(),
        &fixture_source(),
        &TransactionParser::new(),
        &RecordingNotifier::default(),
    )
    .unwrap();

    let coffee = outcome
        .records
        .iter()
        .find(|r| r.date == "12/29/2024")
        .unwrap();
    assert_eq!(coffee.statement_date, "2025-01-15");
    assert_eq!(coffee.description, "Card Purchase Coffee");
    assert_eq!(coffee.amount, Decimal::from_str("-4.50").unwrap());
    assert_eq!(coffee.balance, Decimal::from_str("543.40").unwrap());
    assert_eq!(coffee.source_file, "20250115-statements-1234-.pdf");
    assert_eq!(coffee.statement_sequence, Some(1));

    // The card line keeps its inner purchase date in the description
    let grocery = &outcome.records[0];
    assert_eq!(grocery.description, "Card Purchase 11/27 Grocery Store");
}

#[test]
fn test_final_ordering_invariant() {
    let dir = fixture_dir();
    let outcome = run_batch(
        dir.path(),
        &DiscoveryConfig::default(),
        &fixture_source(),
        &TransactionParser::new(),
        &RecordingNotifier::default(),
    )
    .unwrap();

    for pair in outcome.records.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let (da, db) = (a.transaction_date().unwrap(), b.transaction_date().unwrap());
        assert!(
            da < db || (da == db && a.statement_sequence < b.statement_sequence),
            "{:?} before {:?}",
            a.original_line,
            b.original_line
        );
    }
}

#[test]
fn test_rerun_is_identical() {
    let dir = fixture_dir();
    let run = || {
        run_batch(
            dir.path(),
            &DiscoveryConfig::default(),
            &fixture_source(),
            &TransactionParser::new(),
            &RecordingNotifier::default(),
        )
        .unwrap()
        .records
    };

    assert_eq!(run(), run());
}

#[test]
fn test_summary_over_batch() {
    let dir = fixture_dir();
    let outcome = run_batch(
        dir.path(),
        &DiscoveryConfig::default(),
        &fixture_source(),
        &TransactionParser::new(),
        &RecordingNotifier::default(),
    )
    .unwrap();

    let summary = outcome.summary();
    assert_eq!(summary.statements, 3);
    assert_eq!(summary.transactions, 6);
    assert_eq!(summary.credits, Decimal::from_str("2000.12").unwrap());
    assert_eq!(summary.debits, Decimal::from_str("-956.60").unwrap());
    assert_eq!(summary.net_change, Decimal::from_str("1043.52").unwrap());

    let months: Vec<(&str, usize)> = summary
        .monthly
        .iter()
        .map(|m| (m.month.as_str(), m.count))
        .collect();
    assert_eq!(months, vec![("2024-11", 1), ("2024-12", 4), ("2025-01", 1)]);
}

#[test]
fn test_all_statements_empty() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "20240101.pdf");

    let source = FixtureSource {
        pages: HashMap::from([("20240101.pdf", vec!["Nothing but a cover page"])]),
    };
    let err = run_batch(
        dir.path(),
        &DiscoveryConfig::default(),
        &source,
        &TransactionParser::new(),
        &RecordingNotifier::default(),
    )
    .unwrap_err();

    assert!(matches!(err, StmtxError::NoTransactions { files: 1 }));
}

#[test]
fn test_empty_folder() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_batch(
        dir.path(),
        &DiscoveryConfig::default(),
        &fixture_source(),
        &TransactionParser::new(),
        &RecordingNotifier::default(),
    )
    .unwrap_err();

    assert!(matches!(err, StmtxError::NoStatements(_)));
}
