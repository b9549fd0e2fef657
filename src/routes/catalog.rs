use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::models::{Catalog, ParseRequest, ParseResponse};
use crate::services::m3u_parser::hash_source;
use crate::AppState;

type ApiError = (StatusCode, Json<serde_json::Value>);

fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
}

fn respond(hash: String, catalog: Catalog) -> Json<ParseResponse> {
    Json(ParseResponse {
        hash,
        stats: catalog.stats(),
        catalog,
        parsed_at: chrono::Utc::now().timestamp_millis(),
    })
}

/// POST /api/catalog/parse - Fetch a playlist URL and build its catalog
///
/// Transport failures are not errors here: the response carries an empty
/// catalog instead.
pub async fn parse_playlist(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ParseRequest>,
) -> Result<Json<ParseResponse>, ApiError> {
    let url = url::Url::parse(payload.url.trim()).map_err(|_| bad_request("Invalid URL"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(bad_request("Only http(s) playlist URLs are supported"));
    }

    let hash = hash_source(url.as_str().as_bytes());
    let catalog = state.fetcher.fetch_catalog(url.as_str(), &state.parser).await;

    Ok(respond(hash, catalog))
}

/// POST /api/catalog/import - Build a catalog from a playlist body
pub async fn import_playlist(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ParseResponse>, ApiError> {
    if body.is_empty() {
        return Err(bad_request("Empty playlist body"));
    }

    let hash = hash_source(&body);
    let parser = state.parser.clone();
    let catalog = tokio::task::spawn_blocking(move || parser.parse_bytes(&body))
        .await
        .map_err(|e| {
            tracing::error!("Parse task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to parse playlist" })),
            )
        })?;

    Ok(respond(hash, catalog))
}
