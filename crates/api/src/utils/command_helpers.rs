//! Command execution helpers
//!
//! Removes the timing and logging boilerplate from each command.

use std::time::Instant;

use cipherlog_domain::Result as DomainResult;

use crate::utils::logging::{error_label, log_command_execution};

/// Execute a command with automatic timing and outcome logging
///
/// # Example
///
/// ```rust,ignore
/// pub fn fetch_records(ctx: &AppContext, db: &Path, limit: Option<usize>) -> Result<Vec<LogRecord>> {
///     execute_command("records::fetch_records", || ctx.service.fetch_records(db, limit))
/// }
/// ```
pub fn execute_command<F, T>(command_name: &str, command_fn: F) -> DomainResult<T>
where
    F: FnOnce() -> DomainResult<T>,
{
    let start = Instant::now();

    let result = command_fn();

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), error_type);

    result
}

#[cfg(test)]
mod tests {
    use cipherlog_domain::CipherlogError;

    use super::*;

    #[test]
    fn returns_the_command_result_unchanged() {
        assert_eq!(execute_command("test::ok", || Ok(7)).unwrap(), 7);

        let err = execute_command::<_, ()>("test::err", || {
            Err(CipherlogError::Storage("disk full".into()))
        })
        .unwrap_err();
        assert_eq!(err, CipherlogError::Storage("disk full".into()));
    }
}
