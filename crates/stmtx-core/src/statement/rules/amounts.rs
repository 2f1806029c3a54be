//! Monetary token extraction for statement lines.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::MONEY_TOKEN;
use super::{ExtractionMatch, FieldExtractor};

/// Extracts `-1,234.56` style tokens from a line.
pub struct MoneyExtractor;

impl MoneyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MoneyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for MoneyExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        MONEY_TOKEN
            .find_iter(text)
            .filter_map(|m| {
                let value = parse_amount(m.as_str())?;
                Some(ExtractionMatch::new(value, m.as_str()))
            })
            .collect()
    }
}

/// Parse a statement amount such as `-1,234.56`, dropping thousands separators.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned = s.trim().replace(',', "");
    let mut amount = Decimal::from_str(&cleaned).ok()?;
    amount.rescale(2);
    Some(amount)
}

/// Split the monetary tokens of a transaction line into (amount, balance).
///
/// The last token is the running balance and the one before it the amount.
/// Lines with fewer than two tokens yield `None`.
pub fn amount_and_balance(
    tokens: &[ExtractionMatch<Decimal>],
) -> Option<(&ExtractionMatch<Decimal>, &ExtractionMatch<Decimal>)> {
    match tokens {
        [.., amount, balance] => Some((amount, balance)),
        _ => None,
    }
}
