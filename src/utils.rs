//! Text helpers shared by the pipeline stages.
//!
//! - Word and character truncation applied before model calls
//! - Score rounding
//! - Shortening long strings for log fields

use itertools::Itertools;

/// Keep at most `max_words` whitespace-delimited tokens.
///
/// Text that already fits is returned unchanged. Longer text is cut after
/// `max_words` tokens and re-joined with single spaces, so the result never
/// holds more than `max_words` tokens.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_words("a b  c", 2), "a b");
/// assert_eq!(truncate_words("a b  c", 5), "a b  c");
/// ```
pub fn truncate_words(text: &str, max_words: usize) -> String {
    if text.split_whitespace().nth(max_words).is_none() {
        return text.to_string();
    }
    text.split_whitespace().take(max_words).join(" ")
}

/// Keep the first `max_chars` characters, cutting mid-word if needed.
///
/// Counts Unicode scalar values, so the cut always lands on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters and suffixed with the number of
/// bytes that were dropped.
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let head = truncate_chars(s, max);
    if head.len() == s.len() {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", head, s.len() - head.len())
    }
}
