//! meldo-core
//!
//! Pure domain types and the permission policy for the issue-reporting
//! system. No I/O; this is the shared vocabulary of the Meldo crates.

pub mod error;
pub mod models;
pub mod policy;
