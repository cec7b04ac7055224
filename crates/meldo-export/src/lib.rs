//! meldo-export
//!
//! CSV serialization of the report list for the admin download.

pub mod csv;

pub use csv::{COLUMNS, export_filename, reports_to_csv};
