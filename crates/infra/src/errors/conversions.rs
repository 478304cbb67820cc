//! Conversions from external infrastructure errors into domain errors.

use cipherlog_common::StorageError;
use cipherlog_domain::CipherlogError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CipherlogError);

impl From<InfraError> for CipherlogError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CipherlogError> for InfraError {
    fn from(value: CipherlogError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoCipherlogError {
    fn into_cipherlog(self) -> CipherlogError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → CipherlogError */
/* -------------------------------------------------------------------------- */

impl IntoCipherlogError for SqlError {
    fn into_cipherlog(self) -> CipherlogError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => CipherlogError::Storage("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        CipherlogError::Storage("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 275) => {
                        CipherlogError::Storage(format!("check constraint violation: {message}"))
                    }
                    (ErrorCode::ConstraintViolation, 1555 | 2067) => {
                        CipherlogError::Storage("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 1299) => {
                        CipherlogError::Storage(format!("not null constraint violation: {message}"))
                    }
                    (ErrorCode::NotADatabase, _) => {
                        CipherlogError::Storage("file is not a database".into())
                    }
                    (ErrorCode::ReadOnly, _) => {
                        CipherlogError::Storage("database is read-only".into())
                    }
                    (ErrorCode::CannotOpen, _) => {
                        CipherlogError::Storage(format!("unable to open database file: {message}"))
                    }
                    _ => CipherlogError::Storage(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => CipherlogError::Storage("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                CipherlogError::Storage(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                CipherlogError::Storage(format!("invalid column type: {ty}"))
            }
            RE::IntegralValueOutOfRange(_, value) => {
                CipherlogError::Storage(format!("integer value out of range: {value}"))
            }
            RE::Utf8Error(_) => CipherlogError::Storage("invalid UTF-8 returned from sqlite".into()),
            RE::InvalidPath(path) => CipherlogError::Storage(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => CipherlogError::Storage("invalid SQL query".into()),
            other => CipherlogError::Storage(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_cipherlog())
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → CipherlogError */
/* -------------------------------------------------------------------------- */

impl IntoCipherlogError for StorageError {
    fn into_cipherlog(self) -> CipherlogError {
        match self {
            StorageError::Rusqlite(err) => err.into_cipherlog(),
            StorageError::InvalidConfig(message) => CipherlogError::Config(message),
            StorageError::Common(common) => common.into(),
            other => CipherlogError::Storage(other.to_string()),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_cipherlog())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → CipherlogError */
/* -------------------------------------------------------------------------- */

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(CipherlogError::Storage(format!("I/O error: {value}")))
    }
}

/// Map a rusqlite error straight into the domain error
pub fn map_sql_error(err: SqlError) -> CipherlogError {
    CipherlogError::from(InfraError::from(err))
}

/// Map a storage error straight into the domain error
pub fn map_storage_error(err: StorageError) -> CipherlogError {
    CipherlogError::from(InfraError::from(err))
}
