//! Rule-based extractors for Chase statement lines.

pub mod amounts;
pub mod dates;
pub mod description;
pub mod patterns;

pub use amounts::{amount_and_balance, parse_amount, MoneyExtractor};
pub use dates::{match_leading_date, resolve_statement_date, resolve_transaction_year};
pub use description::extract_description;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract every occurrence of the field, in text order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value extracted from text together with the literal text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            source: source.into(),
        }
    }
}
