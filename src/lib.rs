#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_excessive_bools,
    clippy::similar_names
)]

//! # Pairup Server
//!
//! An in-memory WebSocket matchmaking and signaling broker for one-to-one
//! peer sessions.
//!
//! Clients ask for a partner, wait in a first-come-first-served queue, get
//! paired two at a time into short-lived rooms and then exchange opaque
//! negotiation and chat payloads through the broker. Nothing is persisted.

/// Server configuration and environment variables
pub mod config;

/// Structured logging configuration
pub mod logging;

/// Metrics collection and reporting
pub mod metrics;

/// WebSocket message protocol definitions
pub mod protocol;

/// Matchmaking broker: queue, rooms and relay
pub mod server;

/// WebSocket connection handling
pub mod websocket;
