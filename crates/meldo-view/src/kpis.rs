use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use meldo_core::models::category::Category;
use meldo_core::models::report::{Report, Status};

/// Aggregate figures for the admin dashboard, computed in one pass over
/// the report list at `now`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Kpis {
    pub total: usize,
    pub approved: usize,
    pub unapproved: usize,
    pub by_status: BTreeMap<Status, usize>,
    pub by_category: BTreeMap<Category, usize>,
    pub total_votes: usize,
    /// Mean minutes from `reported` to `accepted`, one decimal. `None`
    /// when no report has both timestamps.
    pub avg_minutes_to_accept: Option<f64>,
    /// Mean minutes from `reported` to `resolved`, one decimal.
    pub avg_minutes_to_resolve: Option<f64>,
    pub last_7_days: usize,
    pub last_30_days: usize,
    /// Most frequent non-empty area; ties break to the alphabetically
    /// first so the dashboard is deterministic.
    pub top_area: Option<String>,
    /// Creation trend, keyed by ISO date (UTC).
    pub per_day: BTreeMap<String, usize>,
}

fn minutes_between(from: jiff::Timestamp, to: jiff::Timestamp) -> f64 {
    (to.as_millisecond() - from.as_millisecond()) as f64 / 60_000.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn average(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(round1(samples.iter().sum::<f64>() / samples.len() as f64))
}

pub fn compute_kpis(reports: &[Report], now: jiff::Timestamp) -> Kpis {
    let mut kpis = Kpis {
        total: reports.len(),
        ..Kpis::default()
    };

    let week_ago = now - jiff::SignedDuration::from_hours(7 * 24);
    let month_ago = now - jiff::SignedDuration::from_hours(30 * 24);

    let mut to_accept = Vec::new();
    let mut to_resolve = Vec::new();
    let mut areas: BTreeMap<String, usize> = BTreeMap::new();

    for report in reports {
        if report.approved {
            kpis.approved += 1;
        } else {
            kpis.unapproved += 1;
        }
        *kpis.by_status.entry(report.status).or_default() += 1;
        *kpis.by_category.entry(report.category).or_default() += 1;
        kpis.total_votes += report.votes.count();

        if let Some(accepted) = report.accepted_at() {
            to_accept.push(minutes_between(report.created_at, accepted));
        }
        if let Some(resolved) = report.resolved_at() {
            to_resolve.push(minutes_between(report.created_at, resolved));
        }

        if report.created_at >= week_ago {
            kpis.last_7_days += 1;
        }
        if report.created_at >= month_ago {
            kpis.last_30_days += 1;
        }

        let area = report.area().trim();
        if !area.is_empty() {
            *areas.entry(area.to_string()).or_default() += 1;
        }

        let day = report
            .created_at
            .to_zoned(jiff::tz::TimeZone::UTC)
            .date()
            .to_string();
        *kpis.per_day.entry(day).or_default() += 1;
    }

    kpis.avg_minutes_to_accept = average(&to_accept);
    kpis.avg_minutes_to_resolve = average(&to_resolve);

    // BTreeMap iteration is alphabetical, so strictly-greater keeps the
    // first name on ties.
    let mut best = 0;
    for (area, count) in &areas {
        if *count > best {
            best = *count;
            kpis.top_area = Some(area.clone());
        }
    }

    kpis
}
