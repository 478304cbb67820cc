//! Session commands
//!
//! A session derives the key once and reuses it for every record, which is
//! what the capture window and the viewer want.

use std::path::Path;

use chrono::Utc;
use cipherlog_core::LogSession;
use cipherlog_domain::{DecryptedRecord, KeyEventPayload, Result};
use tracing::debug;

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Start a capture session, creating the database's params if needed
pub fn start_logging(ctx: &AppContext, db: &Path, passphrase: &str) -> Result<LogSession> {
    execute_command("session::start_logging", || {
        let session = ctx.service.open_for_writing(db, passphrase)?;
        debug!(
            created_at = %session.params().created_at,
            kdf_iterations = session.params().kdf_iterations,
            "logging to database"
        );
        Ok(session)
    })
}

/// Encrypt and append one key event stamped with the current time
pub fn record_key_event(session: &LogSession, event: &KeyEventPayload) -> Result<i64> {
    execute_command("session::record_key_event", || session.record_key_event(event, Utc::now()))
}

/// Decrypt the newest records for display
///
/// An empty list means nothing has been logged to `db`. A wrong passphrase
/// fails the whole call with `Decryption`.
pub fn view_log(
    ctx: &AppContext,
    db: &Path,
    passphrase: &str,
    limit: Option<usize>,
) -> Result<Vec<DecryptedRecord>> {
    execute_command("session::view_log", || match ctx.service.open_for_reading(db, passphrase)? {
        Some(session) => session.load(limit),
        None => Ok(Vec::new()),
    })
}
