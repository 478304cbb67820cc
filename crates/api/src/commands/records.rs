//! Log record commands

use std::path::Path;

use cipherlog_domain::{parse_timestamp, CipherlogError, IndexFields, LogRecord, Result};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Append an already-encrypted record
///
/// `timestamp` must be `YYYY-MM-DDTHH:MM:SSZ`. Returns the new record id.
pub fn append_record(
    ctx: &AppContext,
    db: &Path,
    timestamp: &str,
    event_type: &str,
    index_fields: &IndexFields,
    ciphertext: &[u8],
) -> Result<i64> {
    execute_command("records::append_record", || {
        parse_timestamp(timestamp)?;
        if event_type.trim().is_empty() {
            return Err(CipherlogError::InvalidInput("event_type must not be empty".into()));
        }
        if ciphertext.is_empty() {
            return Err(CipherlogError::InvalidInput("ciphertext must not be empty".into()));
        }

        ctx.event_log.append(db, timestamp, event_type, index_fields, ciphertext)
    })
}

/// Newest records first; `None` returns every record
///
/// A database that does not exist yet yields an empty list.
pub fn fetch_records(ctx: &AppContext, db: &Path, limit: Option<usize>) -> Result<Vec<LogRecord>> {
    execute_command("records::fetch_records", || ctx.service.fetch_records(db, limit))
}

/// Records with `start <= timestamp <= end`, newest first
pub fn fetch_records_between(
    ctx: &AppContext,
    db: &Path,
    start: &str,
    end: &str,
    limit: Option<usize>,
) -> Result<Vec<LogRecord>> {
    execute_command("records::fetch_records_between", || {
        if parse_timestamp(start)? > parse_timestamp(end)? {
            return Err(CipherlogError::InvalidInput(format!(
                "range start {start} is after end {end}"
            )));
        }
        ctx.event_log.fetch_between(db, start, end, limit)
    })
}

/// Number of records stored
pub fn count_records(ctx: &AppContext, db: &Path) -> Result<u64> {
    execute_command("records::count_records", || ctx.event_log.count(db))
}
