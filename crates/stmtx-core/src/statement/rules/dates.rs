//! Statement date and transaction year resolution.

use super::patterns::{ISO_DATE, LEADING_DATE, STATEMENT_DATE};

/// Derive a sortable statement date from a file name.
///
/// The first run of eight digits is read as `YYYYMMDD` and returned as `YYYY-MM-DD`.
/// File names without such a run are returned unchanged, so they still sort lexically.
pub fn resolve_statement_date(filename: &str) -> String {
    match STATEMENT_DATE.captures(filename) {
        Some(caps) => format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]),
        None => filename.to_string(),
    }
}

/// Infer the calendar year of an `MM/DD` transaction date from its statement date.
///
/// A December transaction on a January statement belongs to the prior year, and a
/// January transaction on a December statement to the following one. Everything else
/// shares the statement's year.
///
/// Returns `None` when either input is not numerically shaped, e.g. when the
/// statement date fell back to a file name.
pub fn resolve_transaction_year(transaction_date: &str, statement_date: &str) -> Option<String> {
    let trans_month: u32 = transaction_date.split('/').next()?.trim().parse().ok()?;

    let caps = ISO_DATE.captures(statement_date)?;
    let statement_year: i32 = caps[1].parse().ok()?;
    let statement_month: u32 = caps[2].parse().ok()?;

    let year = match (statement_month, trans_month) {
        (1, 12) => statement_year - 1,
        (12, 1) => statement_year + 1,
        _ => statement_year,
    };

    Some(format!("{:04}", year))
}

/// Match an `MM/DD` date at the start of an already-trimmed line.
pub fn match_leading_date(line: &str) -> Option<&str> {
    LEADING_DATE.find(line).map(|m| m.as_str())
}
