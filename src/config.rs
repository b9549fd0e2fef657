use std::env;

use crate::services::content_filter::ContentFilter;

/// Desktop browser user agent; some playlist hosts reject unknown clients
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Fetching
    pub user_agent: String,
    pub connect_timeout_ms: u64,
    pub fetch_timeout_ms: u64,
    pub max_retries: u32,
    pub max_playlist_size_mb: usize,

    // Filtering
    pub blocked_keywords: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            // Server
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .unwrap_or(3001),

            // Fetching
            user_agent: env::var("USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),

            connect_timeout_ms: env::var("CONNECT_TIMEOUT_MS")
                .unwrap_or_else(|_| "30000".to_string())
                .parse()
                .unwrap_or(30_000), // 30 seconds

            fetch_timeout_ms: env::var("FETCH_TIMEOUT_MS")
                .unwrap_or_else(|_| "300000".to_string())
                .parse()
                .unwrap_or(300_000), // 5 minutes

            max_retries: env::var("MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap_or(3),

            max_playlist_size_mb: env::var("MAX_PLAYLIST_SIZE_MB")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .unwrap_or(500),

            // Filtering
            blocked_keywords: env::var("BLOCKED_KEYWORDS")
                .ok()
                .map(|v| parse_keyword_list(&v)),
        }
    }

    /// Content filter from `BLOCKED_KEYWORDS`, or the built-in list
    pub fn content_filter(&self) -> ContentFilter {
        match &self.blocked_keywords {
            Some(keywords) => ContentFilter::new(keywords),
            None => ContentFilter::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3001,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout_ms: 30_000,
            fetch_timeout_ms: 300_000,
            max_retries: 3,
            max_playlist_size_mb: 500,
            blocked_keywords: None,
        }
    }
}

fn parse_keyword_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keyword_list() {
        assert_eq!(
            parse_keyword_list(" spoiler, leak ,,"),
            vec!["spoiler".to_string(), "leak".to_string()]
        );
        assert!(parse_keyword_list("").is_empty());
    }

    #[test]
    fn test_default_fetch_timeout_allows_large_playlists() {
        let config = Config::default();
        assert_eq!(config.fetch_timeout_ms, 300_000);
        assert_eq!(config.max_playlist_size_mb, 500);
    }

    #[test]
    fn test_content_filter_from_config() {
        let config = Config::default();
        assert_eq!(config.content_filter(), ContentFilter::default());

        let config = Config {
            blocked_keywords: Some(vec!["Spoiler".to_string()]),
            ..Config::default()
        };
        let filter = config.content_filter();
        assert!(filter.is_blocked("Big spoiler", "Series"));
        assert!(!filter.is_blocked("XXX", "Adult"));
    }
}
