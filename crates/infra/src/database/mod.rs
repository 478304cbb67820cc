//! Database implementations

pub mod crypto_params_repository;
pub mod event_log_repository;
pub mod manager;

pub use crypto_params_repository::*;
pub use event_log_repository::*;
pub use manager::*;
