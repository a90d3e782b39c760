//! Input validation helpers.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

/// Maximum number of characters kept from an event title.
pub const MAX_TITLE_CHARS: usize = 50;

/// Furthest an event may be scheduled ahead of now (ten 365-day years).
pub const MAX_FUTURE_SECS: i64 = 365 * 24 * 60 * 60 * 10;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

/// Check an address against the `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    let valid = email_regex().is_match(email);
    debug!(email = %email, valid, "Validating email");
    valid
}

/// Whether a JSON value counts as supplied: `null`, `false`, zero, and empty
/// strings, arrays and objects do not.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Coerce a JSON value to an integer timestamp.
///
/// Integers pass through, floats truncate toward zero, booleans become 0/1 and
/// strings must hold a signed decimal integer (surrounding whitespace allowed,
/// single underscores between digits ignored).
pub fn coerce_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_integer(s),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return None;
    }
    text.replace('_', "").parse().ok()
}

/// Validate that `value` is a timestamp in `(now, now + MAX_FUTURE_SECS]`.
///
/// Returns the coerced timestamp when it is in range.
pub fn future_timestamp(value: &Value, now: i64) -> Option<i64> {
    let timestamp = coerce_timestamp(value)?;
    let valid = now < timestamp && timestamp <= now.saturating_add(MAX_FUTURE_SECS);
    debug!(timestamp, now, valid, "Validating timestamp");
    valid.then_some(timestamp)
}

/// Truncate a title to `MAX_TITLE_CHARS` characters.
pub fn truncate_title(title: &str) -> String {
    title.chars().take(MAX_TITLE_CHARS).collect()
}
