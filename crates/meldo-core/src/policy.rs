//! Centralized permission policy.
//!
//! Every mutation in the store consults these predicates instead of
//! re-deriving role checks per action.

use crate::models::report::Report;
use crate::models::user::User;

/// Moderators and admins may approve, reject, and forward reports.
pub fn can_moderate(user: Option<&User>) -> bool {
    user.map(|u| u.is_admin || u.is_moderator).unwrap_or(false)
}

fn owns(identity: &str, report: &Report) -> bool {
    report.reporter_id.as_deref() == Some(identity)
}

/// Status may be advanced by moderators/admins or by the reporter
/// themselves (identified by user id or device id).
pub fn can_advance(user: Option<&User>, identity: &str, report: &Report) -> bool {
    can_moderate(user) || owns(identity, report)
}

/// Deletion is gated to moderators/admins and the report's owner.
pub fn can_delete(user: Option<&User>, identity: &str, report: &Report) -> bool {
    can_moderate(user) || owns(identity, report)
}
