//! Shared test support for core service tests

pub mod stores;
