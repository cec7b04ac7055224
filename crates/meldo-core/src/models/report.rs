use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::models::category::Category;
use crate::models::location::Location;

/// Lifecycle stage of a report. Manual advance cycles back to `Reported`
/// after `Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Status {
    Reported,
    Accepted,
    Resolved,
}

impl Status {
    pub const CYCLE: [Status; 3] = [Status::Reported, Status::Accepted, Status::Resolved];

    pub fn next(self) -> Status {
        match self {
            Status::Reported => Status::Accepted,
            Status::Accepted => Status::Resolved,
            Status::Resolved => Status::Reported,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Reported => "reported",
            Status::Accepted => "accepted",
            Status::Resolved => "resolved",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::CYCLE
            .into_iter()
            .find(|st| st.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| CoreError::InvalidStatus(s.to_string()))
    }
}

/// One entry in a report's append-only status history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusChange {
    pub status: Status,
    pub at: jiff::Timestamp,
}

/// One vote per identity. The count is the size of the voter set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Votes {
    pub voters: BTreeSet<String>,
}

impl Votes {
    pub fn count(&self) -> usize {
        self.voters.len()
    }

    /// Returns true if the voter was newly added, false if they had
    /// already voted (idempotent).
    pub fn add(&mut self, voter_id: impl Into<String>) -> bool {
        self.voters.insert(voter_id.into())
    }
}

/// A single citizen-submitted issue record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Report {
    /// Timestamp-derived, unique within one store.
    pub id: i64,
    pub category: Category,
    pub description: String,
    /// Opaque reference to locally held image data, if any.
    pub image: Option<String>,
    pub location: Option<Location>,
    pub status: Status,
    /// `None` = anonymous submission.
    pub reporter_id: Option<String>,
    pub votes: Votes,
    /// Moderation gate; unapproved reports are hidden from non-moderators.
    pub approved: bool,
    pub status_history: Vec<StatusChange>,
    pub forwarded: bool,
    pub forwarded_at: Option<jiff::Timestamp>,
    pub forwarded_to: Option<String>,
    pub created_at: jiff::Timestamp,
}

impl Report {
    /// A freshly submitted report: status `Reported`, unapproved, no
    /// votes, single-entry history matching the status.
    pub fn new(
        id: i64,
        category: Category,
        description: impl Into<String>,
        location: Location,
        reporter_id: Option<String>,
        at: jiff::Timestamp,
    ) -> Self {
        Self {
            id,
            category,
            description: description.into(),
            image: None,
            location: Some(location),
            status: Status::Reported,
            reporter_id,
            votes: Votes::default(),
            approved: false,
            status_history: vec![StatusChange {
                status: Status::Reported,
                at,
            }],
            forwarded: false,
            forwarded_at: None,
            forwarded_to: None,
            created_at: at,
        }
    }

    /// Cycle the status forward and append the matching history entry.
    pub fn advance(&mut self, at: jiff::Timestamp) -> Status {
        self.status = self.status.next();
        self.status_history.push(StatusChange {
            status: self.status,
            at,
        });
        self.status
    }

    fn first_entry(&self, status: Status) -> Option<jiff::Timestamp> {
        self.status_history
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.at)
    }

    pub fn accepted_at(&self) -> Option<jiff::Timestamp> {
        self.first_entry(Status::Accepted)
    }

    pub fn resolved_at(&self) -> Option<jiff::Timestamp> {
        self.first_entry(Status::Resolved)
    }

    pub fn area(&self) -> &str {
        self.location.as_ref().map(|l| l.area.as_str()).unwrap_or("")
    }

    pub fn zip(&self) -> &str {
        self.location.as_ref().map(|l| l.zip.as_str()).unwrap_or("")
    }
}
