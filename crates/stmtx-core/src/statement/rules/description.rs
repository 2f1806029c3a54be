//! Description recovery for transaction lines.

/// Recover the description of a transaction line.
///
/// Takes the text between the end of the first occurrence of `date_token` and the
/// last occurrence of `amount_token`, trimmed. This is positional, not column-aware:
/// if the description itself ends with the amount's exact text the cut lands on the
/// wrong occurrence.
pub fn extract_description(line: &str, date_token: &str, amount_token: &str) -> String {
    let start = match line.find(date_token) {
        Some(pos) => pos + date_token.len(),
        None => 0,
    };
    let end = line.rfind(amount_token).unwrap_or(line.len());

    if end <= start {
        return String::new();
    }

    line[start..end].trim().to_string()
}
