//! SQLite connection configuration

use std::time::Duration;

/// Default time a connection waits on a locked database before failing
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Per-connection SQLite settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteConfig {
    /// How long a statement waits for a competing writer's lock
    pub busy_timeout: Duration,

    /// Use WAL journaling (adds `-wal`/`-shm` sidecar files)
    pub enable_wal: bool,

    /// `synchronous=FULL` instead of `NORMAL`
    pub synchronous_full: bool,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            enable_wal: false,
            synchronous_full: true,
        }
    }
}

impl SqliteConfig {
    /// Build a config from a millisecond busy timeout and journaling flags
    pub fn new(busy_timeout_ms: u64, enable_wal: bool, synchronous_full: bool) -> Self {
        Self { busy_timeout: Duration::from_millis(busy_timeout_ms), enable_wal, synchronous_full }
    }
}
