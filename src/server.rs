use crate::metrics::ServerMetrics;
use crate::protocol::{ClientId, RoomId, ServerMessage};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

mod connection_manager;
mod matchmaking;
#[cfg(test)]
mod matchmaking_tests;
mod message_router;
mod messaging;
mod relay;
mod room_manager;
mod room_service;
mod session;
mod waiting_queue;

use connection_manager::{ClientConnection, ConnectionRegistry, IpConnectionLimiter};
use room_manager::RoomManager;
use waiting_queue::WaitingQueue;

pub use room_manager::Room;
pub use session::{SessionEvent, SessionState, TransitionError};

/// Matchmaking broker: waiting queue, room table and client registry.
///
/// One instance is shared by every connection handler through an `Arc`.
pub struct MatchmakingServer {
    /// Queue, rooms and client records, mutated together
    state: Mutex<MatchState>,
    /// Per-IP connection accounting
    ip_limiter: IpConnectionLimiter,
    /// Server configuration
    config: ServerConfig,
    /// Server metrics
    pub(crate) metrics: Arc<ServerMetrics>,
    /// Instance identifier
    instance_id: Uuid,
}

/// Everything that must change atomically when clients pair, leave or vanish.
pub(crate) struct MatchState {
    registry: ConnectionRegistry,
    queue: WaitingQueue,
    rooms: RoomManager,
    metrics: Arc<ServerMetrics>,
}

impl MatchState {
    fn new(metrics: Arc<ServerMetrics>) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            queue: WaitingQueue::new(),
            rooms: RoomManager::new(),
            metrics,
        }
    }

    fn deliver(&self, client_id: &ClientId, message: ServerMessage) -> bool {
        self.registry.deliver(client_id, message, &self.metrics)
    }

    fn room_of(&self, client_id: &ClientId) -> Option<&Room> {
        let room_id = self.registry.get(client_id)?.room_id?;
        self.rooms.get(&room_id)
    }
}

#[derive(Debug, Error)]
pub enum RegisterClientError {
    #[error("Too many connections from your IP ({current}/{limit})")]
    IpLimitExceeded { current: usize, limit: usize },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub max_connections_per_ip: usize,
    pub max_message_size: usize,
    /// Capacity of each client's outbound message channel
    pub outbound_queue_capacity: usize,
    pub require_metrics_auth: bool,
    pub metrics_auth_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_connections_per_ip: 10,
            max_message_size: 65536, // 64KB
            outbound_queue_capacity: 64,
            require_metrics_auth: false,
            metrics_auth_token: None,
        }
    }
}

/// Point-in-time view of the broker's collections.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MatchStats {
    pub connected_clients: usize,
    pub waiting_clients: usize,
    pub active_rooms: usize,
}

impl MatchmakingServer {
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let metrics = Arc::new(ServerMetrics::new());
        let instance_id = Uuid::new_v4();

        tracing::info!(
            %instance_id,
            max_connections_per_ip = config.max_connections_per_ip,
            "Matchmaking server initialized"
        );

        Arc::new(Self {
            state: Mutex::new(MatchState::new(metrics.clone())),
            ip_limiter: IpConnectionLimiter::new(config.max_connections_per_ip),
            config,
            metrics,
            instance_id,
        })
    }

    /// Register a new client connection
    pub async fn register_client(
        &self,
        sender: mpsc::Sender<Arc<ServerMessage>>,
        client_addr: SocketAddr,
    ) -> Result<ClientId, RegisterClientError> {
        let ip = client_addr.ip();
        if let Err(current) = self.ip_limiter.try_reserve(ip) {
            tracing::warn!(
                %ip,
                current,
                max = self.ip_limiter.limit(),
                "IP connection limit exceeded"
            );
            self.metrics.increment_connection_rejections();
            return Err(RegisterClientError::IpLimitExceeded {
                current,
                limit: self.ip_limiter.limit(),
            });
        }

        let client_id = Uuid::new_v4();
        self.state
            .lock()
            .await
            .registry
            .insert(client_id, ClientConnection::new(sender, client_addr));
        self.metrics.increment_connections();

        tracing::info!(%client_id, instance_id = %self.instance_id, %client_addr, "Client registered");
        Ok(client_id)
    }

    /// Connect a client with a specific id, bypassing IP limits (used for testing)
    pub async fn connect_client(
        &self,
        client_id: ClientId,
        sender: mpsc::Sender<Arc<ServerMessage>>,
    ) {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        self.ip_limiter.reserve_unbounded(addr.ip());
        self.state
            .lock()
            .await
            .registry
            .insert(client_id, ClientConnection::new(sender, addr));
        self.metrics.increment_connections();
        tracing::info!(%client_id, instance_id = %self.instance_id, "Client connected");
    }

    /// Disconnect a client (alias for unregister_client)
    pub async fn disconnect_client(&self, client_id: &ClientId) {
        self.unregister_client(client_id).await;
    }

    /// Remove a client from the queue, its room and the registry.
    ///
    /// Safe to call more than once; later calls find nothing to clean up.
    pub async fn unregister_client(&self, client_id: &ClientId) {
        let removed = self.state.lock().await.unregister(client_id);

        let Some(connection) = removed else {
            tracing::debug!(%client_id, "Client already unregistered");
            return;
        };

        let ip = connection.client_addr.ip();
        self.ip_limiter.release(ip);
        self.metrics.decrement_active_connections();
        tracing::info!(
            %client_id,
            instance_id = %self.instance_id,
            remaining_for_ip = self.ip_limiter.current(&ip),
            connected_secs = connection.connected_at.elapsed().as_secs(),
            "Client unregistered"
        );
    }

    pub async fn session_state(&self, client_id: &ClientId) -> Option<SessionState> {
        self.state
            .lock()
            .await
            .registry
            .get(client_id)
            .map(|connection| connection.state)
    }

    pub async fn get_client_room(&self, client_id: &ClientId) -> Option<RoomId> {
        self.state
            .lock()
            .await
            .registry
            .get(client_id)
            .and_then(|connection| connection.room_id)
    }

    /// The room `client_id` currently occupies, if any.
    pub async fn get_room(&self, client_id: &ClientId) -> Option<Room> {
        self.state.lock().await.room_of(client_id).cloned()
    }

    pub async fn room_by_id(&self, room_id: &RoomId) -> Option<Room> {
        self.state.lock().await.rooms.get(room_id).cloned()
    }

    /// Waiting clients, longest-waiting first.
    pub async fn waiting_clients(&self) -> Vec<ClientId> {
        self.state.lock().await.queue.iter().copied().collect()
    }

    pub async fn is_waiting(&self, client_id: &ClientId) -> bool {
        self.state.lock().await.queue.contains(client_id)
    }

    pub async fn stats(&self) -> MatchStats {
        let state = self.state.lock().await;
        MatchStats {
            connected_clients: state.registry.len(),
            waiting_clients: state.queue.len(),
            active_rooms: state.rooms.len(),
        }
    }

    /// Liveness check: the match lock can be acquired.
    pub async fn health_check(&self) -> bool {
        let _state = self.state.lock().await;
        true
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get server metrics
    pub fn metrics(&self) -> Arc<ServerMetrics> {
        self.metrics.clone()
    }
}
