//! Regex patterns for Chase statement text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // First run of eight digits in a file name, read as YYYYMMDD
    pub static ref STATEMENT_DATE: Regex = Regex::new(
        r"([0-9]{4})([0-9]{2})([0-9]{2})"
    ).unwrap();

    // MM/DD at the start of a trimmed line
    pub static ref LEADING_DATE: Regex = Regex::new(
        r"^([0-9]{2})/([0-9]{2})"
    ).unwrap();

    // Monetary token: -1,234.56 or 42.00
    pub static ref MONEY_TOKEN: Regex = Regex::new(
        r"-?[0-9,]+\.[0-9]{2}"
    ).unwrap();

    // Statement date in YYYY-MM-DD form
    pub static ref ISO_DATE: Regex = Regex::new(
        r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$"
    ).unwrap();
}
