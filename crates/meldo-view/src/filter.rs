use serde::{Deserialize, Serialize};
use ts_rs::TS;

use meldo_core::models::category::Category;
use meldo_core::models::report::{Report, Status};
use meldo_core::models::user::User;
use meldo_core::policy;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Filter settings for the report list view.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ViewQuery {
    pub status: Option<Status>,
    pub category: Option<Category>,
    /// Case-insensitive area match.
    pub area: Option<String>,
    /// Case-insensitive substring over category, description,
    /// coordinates, area, and zip.
    pub search: Option<String>,
    pub only_mine: bool,
    /// Moderator-only switch to include unapproved reports.
    pub show_unapproved: bool,
    pub sort: SortOrder,
}

fn matches_search(report: &Report, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let mut haystack = format!("{} {}", report.category, report.description);
    if let Some(loc) = &report.location {
        haystack.push(' ');
        haystack.push_str(&loc.coordinate_string());
        haystack.push(' ');
        haystack.push_str(&loc.area);
        haystack.push(' ');
        haystack.push_str(&loc.zip);
    }
    haystack.to_lowercase().contains(&needle)
}

/// The subset of `reports` visible to `viewer`, filtered and sorted.
///
/// Predicates apply in order: moderation visibility, status, category,
/// area, free-text search, ownership. `identity` is the acting identity
/// (user id when logged in, device id otherwise) used by `only_mine`.
pub fn visible_reports<'a>(
    reports: &'a [Report],
    viewer: Option<&User>,
    identity: &str,
    query: &ViewQuery,
) -> Vec<&'a Report> {
    let moderator = policy::can_moderate(viewer);
    let mut out: Vec<&Report> = reports
        .iter()
        .filter(|r| r.approved || (moderator && query.show_unapproved))
        .filter(|r| query.status.is_none_or(|s| r.status == s))
        .filter(|r| query.category.is_none_or(|c| r.category == c))
        .filter(|r| {
            query
                .area
                .as_deref()
                .is_none_or(|a| r.area().eq_ignore_ascii_case(a.trim()))
        })
        .filter(|r| query.search.as_deref().is_none_or(|s| matches_search(r, s.trim())))
        .filter(|r| !query.only_mine || r.reporter_id.as_deref() == Some(identity))
        .collect();

    match query.sort {
        SortOrder::NewestFirst => out.sort_by(|a, b| b.id.cmp(&a.id)),
        SortOrder::OldestFirst => out.sort_by(|a, b| a.id.cmp(&b.id)),
    }
    out
}
