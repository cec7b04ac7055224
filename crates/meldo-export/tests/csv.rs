use meldo_core::models::category::Category;
use meldo_core::models::location::Location;
use meldo_core::models::report::Report;
use meldo_export::{COLUMNS, export_filename, reports_to_csv};

fn ts(ms: i64) -> jiff::Timestamp {
    jiff::Timestamp::from_millisecond(ms).unwrap()
}

fn sample(id: i64, description: &str) -> Report {
    Report::new(
        id,
        Category::Litter,
        description,
        Location::new(51.317, 12.015, "Leuna", "06237"),
        Some("device-a".to_string()),
        ts(0),
    )
}

#[test]
fn row_count_is_reports_plus_header() {
    let reports = vec![sample(1, "overflowing bin"), sample(2, "glass shards")];
    let csv = reports_to_csv(&reports);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), reports.len() + 1);
    assert_eq!(lines[0], COLUMNS.join(","));
}

#[test]
fn booleans_render_as_one_and_zero() {
    let mut approved = sample(1, "overflowing bin");
    approved.approved = true;
    approved.forwarded = true;
    approved.forwarded_at = Some(ts(60_000));
    approved.forwarded_to = Some("Ordnungsamt".to_string());
    let unapproved = sample(2, "glass shards");

    let csv = reports_to_csv(&[approved, unapproved]);
    let lines: Vec<&str> = csv.lines().collect();
    let first: Vec<&str> = lines[1].split(',').collect();
    let second: Vec<&str> = lines[2].split(',').collect();
    assert_eq!(first[4], "1");
    assert_eq!(first[14], "1");
    assert_eq!(second[4], "0");
    assert_eq!(second[14], "0");
}

#[test]
fn lifecycle_timestamps_fill_their_columns() {
    let mut report = sample(1, "overflowing bin");
    report.advance(ts(600_000));
    report.advance(ts(1_200_000));
    let csv = reports_to_csv(&[report]);
    let fields: Vec<&str> = csv.lines().nth(1).unwrap().split(',').collect();
    assert_eq!(fields[5], "1970-01-01T00:00:00Z");
    assert_eq!(fields[6], "1970-01-01T00:10:00Z");
    assert_eq!(fields[7], "1970-01-01T00:20:00Z");
}

#[test]
fn descriptions_with_commas_and_quotes_are_escaped() {
    let report = sample(1, "bin full, again \"daily\"");
    let csv = reports_to_csv(&[report]);
    assert!(csv.contains("\"bin full, again \"\"daily\"\"\""));
    // The quoted comma must not create an extra column.
    let line = csv.lines().nth(1).unwrap();
    let naive_splits = line.split(',').count();
    assert_eq!(naive_splits, COLUMNS.len() + 1);
}

#[test]
fn vote_counts_and_identity_are_exported() {
    let mut report = sample(1, "overflowing bin");
    report.votes.add("a");
    report.votes.add("b");
    let csv = reports_to_csv(&[report]);
    let fields: Vec<&str> = csv.lines().nth(1).unwrap().split(',').collect();
    assert_eq!(fields[12], "2");
    assert_eq!(fields[13], "device-a");
}

#[test]
fn filename_carries_region_and_timestamp() {
    let name = export_filename("Saalekreis", ts(0));
    assert_eq!(name, "saalekreis_meldungen_19700101-000000.csv");
}
