//! Encrypted event log: ports and session service

pub mod ports;
pub mod service;
