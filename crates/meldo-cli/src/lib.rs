//! meldo-cli library root.
//!
//! Re-exports internal modules so integration tests can exercise them
//! directly (e.g. config migrations) without going through the binary.

pub mod commands;
pub mod config;
