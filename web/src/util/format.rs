//! Display formatting for counters and timestamps.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

/// Group thousands with commas: `1234567` -> `"1,234,567"`.
#[must_use]
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Date part of an ISO-8601 timestamp, or the input unchanged when it has
/// no `T` separator.
#[must_use]
pub fn format_date(timestamp: &str) -> &str {
    timestamp.split_once('T').map_or(timestamp, |(date, _)| date)
}

/// Initial shown in place of a missing avatar.
#[must_use]
pub fn avatar_initial(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_owned())
}
