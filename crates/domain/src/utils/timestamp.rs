//! Record timestamp formatting
//!
//! Log timestamps are stored as plaintext `YYYY-MM-DDTHH:MM:SSZ` (UTC, second
//! precision). Fixed width means lexicographic order on the column equals
//! chronological order, which is what `ORDER BY ts` relies on.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};

use crate::errors::{CipherlogError, Result};

/// `strftime` pattern of stored timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Format an instant for storage, truncating sub-second precision
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.trunc_subsecs(0).format(TIMESTAMP_FORMAT).to_string()
}

/// Current UTC time in storage form
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Parse a stored timestamp
///
/// # Errors
/// `CipherlogError::InvalidInput` when `value` is not exactly in
/// `YYYY-MM-DDTHH:MM:SSZ` form.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let parsed = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| CipherlogError::InvalidInput(format!("invalid timestamp '{value}': {e}")))?;

    // chrono accepts unpadded fields and a signed year; only the canonical
    // rendering keeps the column sortable.
    if format_timestamp(parsed) != value {
        return Err(CipherlogError::InvalidInput(format!(
            "invalid timestamp '{value}': expected zero-padded YYYY-MM-DDTHH:MM:SSZ"
        )));
    }
    Ok(parsed)
}
