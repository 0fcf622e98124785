//! Codec for the last-activity marker value
//!
//! Both the cookie and the storage entry carry the same payload: epoch
//! milliseconds as a decimal string.

/// Render a timestamp the way it is stored in the cookie and in storage.
#[must_use]
pub fn format_marker(timestamp_ms: i64) -> String {
    timestamp_ms.to_string()
}

/// Parse a marker value.
///
/// Accepts any finite number (fractions are truncated). Empty, blank and
/// non-numeric values yield `None`; callers treat that as "no marker".
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_marker(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value as i64)
}

/// Parse a marker written by another tab.
///
/// Same as [`parse_marker`] but also rejects zero and negative values.
#[must_use]
pub fn parse_remote_marker(raw: &str) -> Option<i64> {
    parse_marker(raw).filter(|timestamp| *timestamp > 0)
}
