pub mod catalog;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    // Imported bodies get the same cap as fetched playlists
    let import_limit = state.config.max_playlist_size_mb.saturating_mul(1024 * 1024);

    Router::new()
        // Health endpoints
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .route("/live", get(health::live))
        // Catalog endpoints
        .route("/api/catalog/parse", post(catalog::parse_playlist))
        .route(
            "/api/catalog/import",
            post(catalog::import_playlist).layer(DefaultBodyLimit::max(import_limit)),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    const FEED: &str = "#EXTM3U\n\
#EXTINF:0 tvg-logo=\"http://img/m.png\" group-title=\"Movies\",Matrix\nhttp://example.com/matrix.mp4\n\
#EXTINF:-1 group-title=\"Live TV\",Channel X\nhttp://example.com/live/1.ts\n\
#EXTINF:0 group-title=\"Adult\",Night XXX\nhttp://example.com/blocked.mp4\n\
#EXTINF:0 group-title=\"Series\",Drama S01E01\nhttp://example.com/drama-1.mkv\n";

    fn app() -> Router {
        app_with_limit(500)
    }

    fn app_with_limit(max_playlist_size_mb: usize) -> Router {
        let config = Config {
            max_retries: 0,
            connect_timeout_ms: 1_000,
            fetch_timeout_ms: 2_000,
            max_playlist_size_mb,
            ..Config::default()
        };
        router(Arc::new(AppState::new(config).unwrap()))
    }

    /// Feed of live channels well past axum's 2MB default body limit
    fn large_feed() -> (String, usize) {
        let mut feed = String::from("#EXTM3U\n");
        let mut entries = 0;
        while feed.len() < 3 * 1024 * 1024 {
            feed.push_str(&format!(
                "#EXTINF:-1 tvg-logo=\"http://img.example.com/logo/{0}.png\" group-title=\"Noticias\",Channel {0}\nhttp://example.com/live/{0}.ts\n",
                entries
            ));
            entries += 1;
        }
        (feed, entries)
    }

    fn import_request(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/catalog/import")
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_import_playlist() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/catalog/import")
                    .body(Body::from(FEED))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["stats"]["movieCount"], 1);
        assert_eq!(json["stats"]["liveCount"], 1);
        assert_eq!(json["stats"]["seriesCount"], 1);
        assert_eq!(json["stats"]["episodeCount"], 1);
        assert_eq!(json["catalog"]["movies"][0]["id"], 0);
        assert_eq!(json["catalog"]["movies"][0]["type"], "movie");
        assert_eq!(json["catalog"]["liveChannels"][0]["id"], 1);
        assert_eq!(json["catalog"]["series"][0]["name"], "Drama");
        assert_eq!(json["hash"].as_str().map(str::len), Some(40));
    }

    #[tokio::test]
    async fn test_import_accepts_large_playlist() {
        let (feed, entries) = large_feed();
        assert!(feed.len() > 2 * 1024 * 1024);

        let response = app().oneshot(import_request(feed)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["stats"]["liveCount"], entries);
    }

    #[tokio::test]
    async fn test_import_respects_configured_size_limit() {
        let (feed, _) = large_feed();
        let response = app_with_limit(1).oneshot(import_request(feed)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_import_rejects_empty_body() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/catalog/import")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_parse_rejects_invalid_url() {
        for url in ["not a url", "ftp://example.com/list.m3u"] {
            let response = app()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/api/catalog/parse")
                        .header("content-type", "application/json")
                        .body(Body::from(serde_json::json!({ "url": url }).to_string()))
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", url);
            let json = json_body(response).await;
            assert!(json["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_parse_unreachable_url_returns_empty_catalog() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/catalog/parse")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({ "url": format!("http://{}/list.m3u", addr) }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["stats"]["movieCount"], 0);
        assert_eq!(json["catalog"]["movies"].as_array().map(Vec::len), Some(0));
        assert_eq!(json["catalog"]["series"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let response = app()
            .oneshot(Request::builder().uri("/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert!(json["blockedKeywords"].as_u64().unwrap_or(0) > 0);

        let response = app()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
