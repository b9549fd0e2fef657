use thiserror::Error;

/// Errors from fetching a playlist body
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network/connection error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// HTTP error (non-2xx status)
    #[error("HTTP {0}")]
    Http(u16),

    /// Body larger than the configured limit
    #[error("playlist too large: {size_mb:.1}MB (limit {limit_mb}MB)")]
    TooLarge { size_mb: f64, limit_mb: usize },

    /// Connection dropped while reading the body
    #[error("failed to read playlist body: {0}")]
    Body(String),
}
