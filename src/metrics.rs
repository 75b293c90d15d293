use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the matchmaking broker and its WebSocket front end
#[derive(Debug)]
pub struct ServerMetrics {
    // Connection metrics
    pub total_connections: AtomicU64,
    pub active_connections: AtomicU64,
    pub disconnections: AtomicU64,
    pub connection_rejections: AtomicU64,
    pub websocket_messages_dropped: AtomicU64,

    // Matchmaking metrics
    pub partner_requests: AtomicU64,
    pub rooms_created: AtomicU64,
    pub rooms_closed: AtomicU64,
    pub peer_left_events: AtomicU64,
    pub self_pairings_prevented: AtomicU64,

    // Relay metrics
    pub signals_relayed: AtomicU64,
    pub signals_dropped: AtomicU64,

    // Error tracking
    pub invalid_frames: AtomicU64,
    pub oversized_frames: AtomicU64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub connections: ConnectionMetrics,
    pub matchmaking: MatchmakingMetrics,
    pub relay: RelayMetrics,
    pub errors: ErrorMetrics,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ConnectionMetrics {
    pub total_connections: u64,
    pub active_connections: u64,
    pub disconnections: u64,
    pub connection_rejections: u64,
    pub websocket_messages_dropped: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MatchmakingMetrics {
    pub partner_requests: u64,
    pub rooms_created: u64,
    pub rooms_closed: u64,
    pub peer_left_events: u64,
    pub self_pairings_prevented: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RelayMetrics {
    pub signals_relayed: u64,
    pub signals_dropped: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorMetrics {
    pub invalid_frames: u64,
    pub oversized_frames: u64,
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerMetrics {
    pub fn new() -> Self {
        Self {
            total_connections: AtomicU64::new(0),
            active_connections: AtomicU64::new(0),
            disconnections: AtomicU64::new(0),
            connection_rejections: AtomicU64::new(0),
            websocket_messages_dropped: AtomicU64::new(0),
            partner_requests: AtomicU64::new(0),
            rooms_created: AtomicU64::new(0),
            rooms_closed: AtomicU64::new(0),
            peer_left_events: AtomicU64::new(0),
            self_pairings_prevented: AtomicU64::new(0),
            signals_relayed: AtomicU64::new(0),
            signals_dropped: AtomicU64::new(0),
            invalid_frames: AtomicU64::new(0),
            oversized_frames: AtomicU64::new(0),
        }
    }

    // Connection metrics
    pub fn increment_connections(&self) {
        self.total_connections.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decrement_active_connections(&self) {
        // fetch_update so a stray double decrement cannot underflow
        let _ =
            self.active_connections
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                    if current > 0 {
                        Some(current - 1)
                    } else {
                        None
                    }
                });
        self.disconnections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_connection_rejections(&self) {
        self.connection_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_websocket_messages_dropped(&self) {
        self.websocket_messages_dropped
            .fetch_add(1, Ordering::Relaxed);
    }

    // Matchmaking metrics
    pub fn increment_partner_requests(&self) {
        self.partner_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rooms_created(&self) {
        self.rooms_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rooms_closed(&self) {
        self.rooms_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_peer_left_events(&self) {
        self.peer_left_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_self_pairings_prevented(&self) {
        self.self_pairings_prevented.fetch_add(1, Ordering::Relaxed);
    }

    // Relay metrics
    pub fn increment_signals_relayed(&self) {
        self.signals_relayed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_signals_dropped(&self) {
        self.signals_dropped.fetch_add(1, Ordering::Relaxed);
    }

    // Error tracking
    pub fn increment_invalid_frames(&self) {
        self.invalid_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_oversized_frames(&self) {
        self.oversized_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: chrono::Utc::now(),
            connections: ConnectionMetrics {
                total_connections: self.total_connections.load(Ordering::Relaxed),
                active_connections: self.active_connections.load(Ordering::Relaxed),
                disconnections: self.disconnections.load(Ordering::Relaxed),
                connection_rejections: self.connection_rejections.load(Ordering::Relaxed),
                websocket_messages_dropped: self.websocket_messages_dropped.load(Ordering::Relaxed),
            },
            matchmaking: MatchmakingMetrics {
                partner_requests: self.partner_requests.load(Ordering::Relaxed),
                rooms_created: self.rooms_created.load(Ordering::Relaxed),
                rooms_closed: self.rooms_closed.load(Ordering::Relaxed),
                peer_left_events: self.peer_left_events.load(Ordering::Relaxed),
                self_pairings_prevented: self.self_pairings_prevented.load(Ordering::Relaxed),
            },
            relay: RelayMetrics {
                signals_relayed: self.signals_relayed.load(Ordering::Relaxed),
                signals_dropped: self.signals_dropped.load(Ordering::Relaxed),
            },
            errors: ErrorMetrics {
                invalid_frames: self.invalid_frames.load(Ordering::Relaxed),
                oversized_frames: self.oversized_frames.load(Ordering::Relaxed),
            },
        }
    }
}
