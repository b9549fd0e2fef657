use lazy_static::lazy_static;
use prometheus::{register_histogram, register_int_counter, Histogram, IntCounter};
use std::time::Duration;

use crate::models::ParseReport;

lazy_static! {
    pub static ref PLAYLISTS_PARSED: IntCounter = register_int_counter!(
        "catalog_playlists_parsed_total",
        "Playlists parsed into catalogs"
    )
    .unwrap();
    pub static ref ITEMS_ACCEPTED: IntCounter = register_int_counter!(
        "catalog_items_accepted_total",
        "Entries accepted into a catalog"
    )
    .unwrap();
    pub static ref ITEMS_BLOCKED: IntCounter = register_int_counter!(
        "catalog_items_blocked_total",
        "Entries dropped by the content filter"
    )
    .unwrap();
    pub static ref ENTRIES_SKIPPED: IntCounter = register_int_counter!(
        "catalog_entries_skipped_total",
        "Malformed attribute lines and orphan URL lines"
    )
    .unwrap();
    pub static ref FETCH_FAILURES: IntCounter = register_int_counter!(
        "catalog_fetch_failures_total",
        "Playlist fetches that degraded to an empty catalog"
    )
    .unwrap();
    pub static ref PARSE_DURATION: Histogram = register_histogram!(
        "catalog_parse_duration_seconds",
        "Time spent parsing a fetched playlist"
    )
    .unwrap();
}

pub fn record_parse(report: &ParseReport, elapsed: Duration) {
    PLAYLISTS_PARSED.inc();
    ITEMS_ACCEPTED.inc_by(report.accepted as u64);
    ITEMS_BLOCKED.inc_by(report.blocked as u64);
    ENTRIES_SKIPPED.inc_by((report.malformed + report.orphan_urls) as u64);
    PARSE_DURATION.observe(elapsed.as_secs_f64());
}

pub fn record_fetch_failure() {
    FETCH_FAILURES.inc();
}
