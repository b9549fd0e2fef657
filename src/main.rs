use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_server::{config::Config, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();
    let port = config.port;

    tracing::info!("Starting Catalog Server v{}", env!("CARGO_PKG_VERSION"));
    if config.blocked_keywords.is_some() {
        tracing::info!("Using blocked keywords from BLOCKED_KEYWORDS");
    }

    // Build application state
    let state = Arc::new(AppState::new(config)?);
    tracing::info!(
        "Playlist fetcher initialized (retries: {}, timeout: {}ms)",
        state.config.max_retries,
        state.config.fetch_timeout_ms
    );

    let app = routes::router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
