use futures::StreamExt;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::Config;
use crate::error::FetchError;
use crate::models::Catalog;
use crate::services::m3u_parser::PlaylistParser;
use crate::services::metrics;

const MAX_BACKOFF_MS: u64 = 10_000;

fn backoff_ms(attempt: u32) -> u64 {
    (1u64 << attempt.min(20)).saturating_mul(500).min(MAX_BACKOFF_MS)
}

/// HTTP transport for playlist bodies
#[derive(Debug, Clone)]
pub struct PlaylistFetcher {
    client: Client,
    max_retries: u32,
    max_size_mb: usize,
}

impl PlaylistFetcher {
    /// Create a new fetcher
    pub fn new(
        user_agent: &str,
        connect_timeout_ms: u64,
        timeout_ms: u64,
        max_retries: u32,
        max_size_mb: usize,
    ) -> Result<Self, FetchError> {
        // Redirects are followed by reqwest's default policy
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_millis(connect_timeout_ms))
            .timeout(Duration::from_millis(timeout_ms))
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            max_retries,
            max_size_mb,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(
            &config.user_agent,
            config.connect_timeout_ms,
            config.fetch_timeout_ms,
            config.max_retries,
            config.max_playlist_size_mb,
        )
    }

    fn max_bytes(&self) -> u64 {
        (self.max_size_mb as u64) * 1024 * 1024
    }

    fn too_large(&self, len: u64) -> FetchError {
        FetchError::TooLarge {
            size_mb: len as f64 / 1024f64 / 1024f64,
            limit_mb: self.max_size_mb,
        }
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<Response, FetchError> {
        let mut attempt = 0u32;

        loop {
            match self.client.get(url).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        if let Some(len) = resp.content_length() {
                            if len > self.max_bytes() {
                                return Err(self.too_large(len));
                            }
                        }
                        return Ok(resp);
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS && attempt < self.max_retries {
                        let backoff = backoff_ms(attempt);
                        tracing::warn!("fetch_retry" = attempt + 1, "reason" = "429", "backoff_ms" = backoff);
                        sleep(Duration::from_millis(backoff)).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(FetchError::Http(status.as_u16()));
                }
                Err(err) => {
                    if attempt < self.max_retries {
                        let backoff = backoff_ms(attempt);
                        tracing::warn!("fetch_retry" = attempt + 1, "reason" = "network", "backoff_ms" = backoff);
                        sleep(Duration::from_millis(backoff)).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(err.into());
                }
            }
        }
    }

    /// Download the full playlist body
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.fetch_with_retry(url).await?;

        if let Some(len) = response.content_length() {
            tracing::info!("Playlist size: {:.2} MB", len as f64 / 1024.0 / 1024.0);
        }

        let max_bytes = self.max_bytes();
        let mut body = Vec::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| FetchError::Body(e.to_string()))?;
            body.extend_from_slice(&chunk);
            if body.len() as u64 > max_bytes {
                return Err(self.too_large(body.len() as u64));
            }
        }

        Ok(body)
    }

    /// Fetch and parse a playlist; any transport failure yields an empty catalog
    pub async fn fetch_catalog(&self, url: &str, parser: &PlaylistParser) -> Catalog {
        tracing::info!("Fetching playlist: {}", url);

        let body = match self.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(url, error = %e, "Playlist fetch failed, returning empty catalog");
                metrics::record_fetch_failure();
                return Catalog::default();
            }
        };

        let parser = parser.clone();
        match tokio::task::spawn_blocking(move || parser.parse_bytes(&body)).await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!("Parse task failed: {}", e);
                Catalog::default()
            }
        }
    }
}
