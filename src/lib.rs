//! Playlist ingestion and content catalog service.
//!
//! The catalog core ([`services::m3u_parser::PlaylistParser`]) is a pure,
//! synchronous transformation from playlist text to a [`models::Catalog`]:
//! entries are scanned, classified as movie, live channel or series episode,
//! filtered against a keyword blocklist, numbered, and episodes are grouped
//! into series with season buckets. Everything else in this crate (HTTP
//! fetching, routes, configuration) wraps that core.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::time::Instant;

use crate::config::Config;
use crate::services::{fetcher::PlaylistFetcher, m3u_parser::PlaylistParser};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub fetcher: PlaylistFetcher,
    pub parser: PlaylistParser,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, error::FetchError> {
        let fetcher = PlaylistFetcher::from_config(&config)?;
        let parser = PlaylistParser::new(config.content_filter());

        Ok(Self {
            config,
            fetcher,
            parser,
            start_time: Instant::now(),
        })
    }
}
