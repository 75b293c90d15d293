use crate::server::MatchmakingServer;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handler::websocket_handler;
use super::metrics::metrics_handler;

const FALLBACK_TEXT: &str =
    "Pairup server. Connect via WebSocket at /ws; health at /health, metrics at /metrics.";

/// Build the CORS layer from a comma-separated origin list, or "*" for any.
pub fn cors_layer(cors_origins: &str) -> CorsLayer {
    if cors_origins.trim() == "*" {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = cors_origins
        .split(',')
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!("No valid CORS origins configured, using permissive CORS");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Create the Axum router: WebSocket, health and metrics, also under `/v1`
pub fn create_router(cors_origins: &str) -> Router<Arc<MatchmakingServer>> {
    let api = Router::new()
        .route("/ws", get(websocket_handler))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(api.clone())
        .nest("/v1", api)
        .route("/health", get(health_check))
        .fallback(|| async { FALLBACK_TEXT })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origins)),
        )
}

/// Health check endpoint
async fn health_check(
    State(server): State<Arc<MatchmakingServer>>,
) -> Result<&'static str, StatusCode> {
    if server.health_check().await {
        Ok("OK")
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

/// Serve the broker on an already-bound listener until the server stops.
pub async fn serve(
    listener: TcpListener,
    server: Arc<MatchmakingServer>,
    cors_origins: &str,
) -> anyhow::Result<()> {
    let app = create_router(cors_origins).with_state(server);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
