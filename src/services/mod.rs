pub mod classifier;
pub mod content_filter;
pub mod fetcher;
pub mod m3u_parser;
pub mod metrics;
pub mod series_grouper;
