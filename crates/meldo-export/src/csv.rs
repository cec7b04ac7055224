use meldo_core::models::report::Report;

/// Fixed export columns, in order.
pub const COLUMNS: [&str; 17] = [
    "id",
    "category",
    "description",
    "status",
    "approved",
    "createdAt",
    "acceptedAt",
    "doneAt",
    "lat",
    "lng",
    "area",
    "zip",
    "votes",
    "reporterId",
    "forwarded",
    "forwardedAt",
    "forwardedTo",
];

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

fn timestamp(value: Option<jiff::Timestamp>) -> String {
    value.map(|t| t.to_string()).unwrap_or_default()
}

fn row(report: &Report) -> String {
    let (lat, lng) = report
        .location
        .as_ref()
        .map(|l| (l.lat.to_string(), l.lng.to_string()))
        .unwrap_or_default();

    let fields = [
        report.id.to_string(),
        report.category.to_string(),
        report.description.clone(),
        report.status.to_string(),
        flag(report.approved).to_string(),
        timestamp(Some(report.created_at)),
        timestamp(report.accepted_at()),
        timestamp(report.resolved_at()),
        lat,
        lng,
        report.area().to_string(),
        report.zip().to_string(),
        report.votes.count().to_string(),
        report.reporter_id.clone().unwrap_or_default(),
        flag(report.forwarded).to_string(),
        timestamp(report.forwarded_at),
        report.forwarded_to.clone().unwrap_or_default(),
    ];
    fields
        .iter()
        .map(|f| quote(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Header plus one row per report, `\r\n` separated.
pub fn reports_to_csv(reports: &[Report]) -> String {
    let mut out = COLUMNS.join(",");
    out.push_str("\r\n");
    for report in reports {
        out.push_str(&row(report));
        out.push_str("\r\n");
    }
    out
}

/// `{region}_meldungen_{YYYYMMDD-HHMMSS}.csv`, the suggested download
/// name for the admin export.
pub fn export_filename(region: &str, now: jiff::Timestamp) -> String {
    let stamp = now
        .to_zoned(jiff::tz::TimeZone::UTC)
        .strftime("%Y%m%d-%H%M%S");
    format!("{}_meldungen_{stamp}.csv", region.to_lowercase())
}
