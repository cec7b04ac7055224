use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SubscriptionKind {
    Area,
    Zip,
}

impl SubscriptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionKind::Area => "area",
            SubscriptionKind::Zip => "zip",
        }
    }
}

impl fmt::Display for SubscriptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "area" => Ok(SubscriptionKind::Area),
            "zip" => Ok(SubscriptionKind::Zip),
            other => Err(CoreError::InvalidSubscriptionKind(other.to_string())),
        }
    }
}

/// A standing interest in notifications for an area or postal code.
///
/// `value` is stored trimmed; equality between subscriptions and against
/// report locations is case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Subscription {
    pub kind: SubscriptionKind,
    pub value: String,
}

impl Subscription {
    pub fn new(kind: SubscriptionKind, value: &str) -> Self {
        Self {
            kind,
            value: value.trim().to_string(),
        }
    }

    pub fn same_as(&self, other: &Subscription) -> bool {
        self.kind == other.kind && self.value.eq_ignore_ascii_case(&other.value)
    }

    /// Does a report at (`area`, `zip`) fall under this subscription?
    pub fn covers(&self, area: &str, zip: &str) -> bool {
        match self.kind {
            SubscriptionKind::Area => {
                !self.value.is_empty() && self.value.eq_ignore_ascii_case(area.trim())
            }
            SubscriptionKind::Zip => !self.value.is_empty() && self.value == zip.trim(),
        }
    }
}
