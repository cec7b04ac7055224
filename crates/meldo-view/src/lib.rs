//! meldo-view
//!
//! Pure derived-view computation over the report list: the filtered and
//! sorted subset a given viewer sees, and the aggregate KPIs for the
//! admin dashboard. No caching; everything is recomputed per call.

pub mod filter;
pub mod kpis;

pub use filter::{SortOrder, ViewQuery, visible_reports};
pub use kpis::{Kpis, compute_kpis};
