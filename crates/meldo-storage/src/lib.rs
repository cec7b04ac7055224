//! meldo-storage
//!
//! Durable local persistence: a file-per-key JSON store standing in for
//! the browser's key-value storage. Thin wrapper around the filesystem.

pub mod error;
pub mod keys;
pub mod state;

pub use error::StorageError;
pub use state::StateDir;
