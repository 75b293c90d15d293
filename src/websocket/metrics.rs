use crate::metrics::MetricsSnapshot;
use crate::server::{MatchStats, MatchmakingServer};
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

fn enforce_metrics_auth(headers: &HeaderMap, server: &MatchmakingServer) -> Result<(), StatusCode> {
    let Some(raw_header) = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    else {
        tracing::warn!("Unauthorized metrics access attempt: missing Authorization header");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let Some(token) = raw_header.strip_prefix("Bearer ") else {
        tracing::warn!("Unauthorized metrics access attempt: invalid Authorization scheme");
        return Err(StatusCode::UNAUTHORIZED);
    };

    match server.config().metrics_auth_token.as_deref() {
        Some(expected) if !expected.is_empty() && token == expected => {
            tracing::debug!("Metrics access authorized via bearer token");
            Ok(())
        }
        _ => {
            tracing::warn!("Unauthorized metrics access attempt: token rejected");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Body of `GET /metrics`. Keys are snake_case at every level.
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub instance_id: Uuid,
    /// Live sizes of the registry, queue and room table
    pub live: MatchStats,
    /// Cumulative counters since start
    pub counters: MetricsSnapshot,
}

/// Metrics endpoint: counters plus live gauges, bearer-protected when configured
pub async fn metrics_handler(
    headers: HeaderMap,
    State(server): State<Arc<MatchmakingServer>>,
) -> Result<Json<MetricsResponse>, StatusCode> {
    if server.config().require_metrics_auth {
        enforce_metrics_auth(&headers, server.as_ref())?;
    }

    Ok(Json(MetricsResponse {
        instance_id: server.instance_id(),
        live: server.stats().await,
        counters: server.metrics.snapshot(),
    }))
}
