//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Environment variables, when `CIPHERLOG_DB_PATH` is set
//! 2. Otherwise the first config file found by [`probe_config_paths`]
//! 3. Otherwise built-in defaults
//!
//! Whatever the source, the result is validated before it is returned.
//!
//! ## Environment Variables
//! - `CIPHERLOG_DB_PATH`: Database file path (required for env loading)
//! - `CIPHERLOG_KDF_ITERATIONS`: PBKDF2 work factor for new databases
//! - `CIPHERLOG_SALT_LEN`: Salt length in bytes for new databases
//! - `CIPHERLOG_BUSY_TIMEOUT_MS`: SQLite busy timeout
//! - `CIPHERLOG_ENABLE_WAL`: Whether to use WAL journaling (true/false)
//!
//! ## File Locations
//! The loader probes, in the current working directory and then next to the
//! executable: `cipherlog.toml`, `cipherlog.json`, `config.toml`,
//! `config.json`.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use cipherlog_domain::{CipherlogError, Config, CryptoConfig, DatabaseConfig, Result};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["cipherlog.toml", "cipherlog.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `CipherlogError::Config` if a source exists but is malformed, or
/// if the loaded values fail validation.
pub fn load() -> Result<Config> {
    let config = if std::env::var_os("CIPHERLOG_DB_PATH").is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        config
    } else if let Some(path) = probe_config_paths() {
        load_from_file(Some(path))?
    } else {
        tracing::debug!("No configuration source found, using defaults");
        Config::default()
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// `CIPHERLOG_DB_PATH` is required; every other variable falls back to its
/// default when unset.
///
/// # Errors
/// Returns `CipherlogError::Config` if the path is missing or a numeric
/// variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let path = env_var("CIPHERLOG_DB_PATH")?;
    let defaults = Config::default();

    Ok(Config {
        database: DatabaseConfig {
            path: PathBuf::from(path),
            busy_timeout_ms: env_parse(
                "CIPHERLOG_BUSY_TIMEOUT_MS",
                defaults.database.busy_timeout_ms,
            )?,
            enable_wal: env_bool("CIPHERLOG_ENABLE_WAL", defaults.database.enable_wal),
            synchronous_full: defaults.database.synchronous_full,
        },
        crypto: CryptoConfig {
            kdf_iterations: env_parse("CIPHERLOG_KDF_ITERATIONS", defaults.crypto.kdf_iterations)?,
            salt_len: env_parse("CIPHERLOG_SALT_LEN", defaults.crypto.salt_len)?,
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Supports both JSON and
/// TOML formats (detected by file extension).
///
/// # Errors
/// Returns `CipherlogError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CipherlogError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CipherlogError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CipherlogError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CipherlogError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CipherlogError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(CipherlogError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        CipherlogError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional numeric environment variable
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| CipherlogError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
