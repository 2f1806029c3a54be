//! Financial summary over the final record set.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::transaction::TransactionRecord;

/// Count and sum of the transactions dated in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    /// `YYYY-MM`.
    pub month: String,
    pub count: usize,
    pub sum: Decimal,
}

/// Totals printed after a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Statements attempted, including skipped ones.
    pub statements: usize,
    pub transactions: usize,
    /// Sum of positive amounts.
    pub credits: Decimal,
    /// Sum of negative amounts (zero or negative).
    pub debits: Decimal,
    pub net_change: Decimal,
    /// Per-month totals in calendar order. Records without a valid date are left out.
    pub monthly: Vec<MonthlyTotal>,
}

impl Summary {
    pub fn from_records(statements: usize, records: &[TransactionRecord]) -> Self {
        let credits: Decimal = records.iter().filter(|r| r.is_credit()).map(|r| r.amount).sum();
        let debits: Decimal = records.iter().filter(|r| r.is_debit()).map(|r| r.amount).sum();

        let mut months: BTreeMap<String, (usize, Decimal)> = BTreeMap::new();
        for record in records {
            if let Some(month) = record.month_key() {
                let entry = months.entry(month).or_insert((0, Decimal::ZERO));
                entry.0 += 1;
                entry.1 += record.amount;
            }
        }

        Self {
            statements,
            transactions: records.len(),
            credits: round2(credits),
            debits: round2(debits),
            net_change: round2(credits + debits),
            monthly: months
                .into_iter()
                .map(|(month, (count, sum))| MonthlyTotal {
                    month,
                    count,
                    sum: round2(sum),
                })
                .collect(),
        }
    }
}

fn round2(value: Decimal) -> Decimal {
    let mut value = value.round_dp(2);
    value.rescale(2);
    value
}

/// Format an amount as `$1,234.56` / `$-1,234.56`.
pub fn format_usd(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("${}{}.{}", sign, grouped, decimal_part)
}
