//! meldo-store
//!
//! The application state container: current identity, report list,
//! subscription registry, and toggles, with every mutation from the
//! report lifecycle. Each successful mutation persists to local storage
//! as a fire-and-forget effect; the in-memory state stays authoritative
//! when a write fails.

pub mod error;
pub mod notify;
pub mod store;

pub use error::StoreError;
pub use notify::{LogSink, Notification, NotificationSink};
pub use store::{AppState, ReportDraft};
