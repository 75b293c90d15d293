// WebSocket front end for the matchmaking broker
//
// - handler: WebSocket upgrade handler (entry point)
// - connection: per-connection send/receive tasks
// - frames: inbound frame validation
// - sending: outbound serialization
// - routes: HTTP routes (ws, health, metrics) and the serve loop
// - metrics: metrics endpoint and bearer auth

mod connection;
mod frames;
mod handler;
mod metrics;
mod routes;
mod sending;

pub use handler::websocket_handler;
pub use metrics::{metrics_handler, MetricsResponse};
pub use routes::{cors_layer, create_router, serve};
