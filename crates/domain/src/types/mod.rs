//! Domain data types

pub mod payload;
pub mod record;

pub use payload::{EventPayload, KeyEventPayload};
pub use record::{CryptoParams, DecryptedRecord, IndexFields, LogRecord};
