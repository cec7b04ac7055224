//! Storage key conventions.
//!
//! Pure constants. These define the canonical set of records the
//! application persists. One JSON file per key under the state directory.

pub const DEVICE_ID: &str = "device_id";

pub const CURRENT_USER: &str = "current_user";

pub const SUBSCRIPTIONS: &str = "subscriptions";

pub const NOTIFY_ON_STATUS_CHANGE: &str = "notify_on_status_change";

pub const LIVE_GEOCODER: &str = "live_geocoder";

pub const REPORTS: &str = "reports";
