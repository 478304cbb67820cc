//! Per-database crypto params commands

use std::path::Path;

use cipherlog_domain::{CryptoParams, Result};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Read the database's params, creating them on first use
///
/// Safe to race: concurrent first calls on the same file all return the one
/// row that was stored.
pub fn get_or_create_params(ctx: &AppContext, db: &Path) -> Result<CryptoParams> {
    execute_command("params::get_or_create_params", || ctx.crypto_params.get_or_create(db))
}

/// Read the database's params without creating anything
///
/// `Ok(None)` means nothing has been written to this database yet.
pub fn get_existing_params(ctx: &AppContext, db: &Path) -> Result<Option<CryptoParams>> {
    execute_command("params::get_existing_params", || ctx.crypto_params.get_existing(db))
}
