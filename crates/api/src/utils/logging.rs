use std::time::Duration;

use cipherlog_domain::CipherlogError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log output format (`json` or `pretty`)
pub const LOG_FORMAT_ENV: &str = "CIPHERLOG_LOG_FORMAT";

/// Install the global tracing subscriber
///
/// Honours `RUST_LOG`, defaulting to `info`. Set `CIPHERLOG_LOG_FORMAT=json`
/// for one JSON object per line. Returns `false` when a subscriber was
/// already installed, which is harmless.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"records::fetch_records"`).
/// * `elapsed` - Duration the command execution took.
/// * `error` - Stable error label when the command failed.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&str>) {
    let duration_ms = duration_ms(elapsed);

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(error) => warn!(command, duration_ms, error, "command_execution_failure"),
    }
}

/// Whole milliseconds, saturating at `u64::MAX`
fn duration_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Convert a `CipherlogError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &CipherlogError) -> &'static str {
    error.label()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_labels_are_stable() {
        assert_eq!(error_label(&CipherlogError::Decryption("tag".into())), "decryption");
        assert_eq!(error_label(&CipherlogError::Storage("locked".into())), "storage");
        assert_eq!(error_label(&CipherlogError::InvalidInput("salt".into())), "invalid_input");
    }

    /// Durations past `u64::MAX` milliseconds saturate instead of wrapping.
    #[test]
    fn duration_ms_saturates() {
        assert_eq!(duration_ms(Duration::from_millis(1_500)), 1_500);
        assert_eq!(duration_ms(Duration::MAX), u64::MAX);
        log_command_execution("test::slow", Duration::MAX, Some("storage"));
    }

    #[test]
    fn init_tracing_is_safe_to_repeat() {
        init_tracing();
        assert!(!init_tracing());
    }
}
