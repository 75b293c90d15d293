use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::metrics::ServerMetrics;
use crate::protocol::{ClientId, RoomId, ServerMessage};

use super::session::SessionState;

#[derive(Debug, Clone)]
pub(crate) struct ClientConnection {
    pub state: SessionState,
    pub room_id: Option<RoomId>,
    pub sender: mpsc::Sender<Arc<ServerMessage>>,
    pub client_addr: SocketAddr,
    pub connected_at: Instant,
}

impl ClientConnection {
    pub fn new(sender: mpsc::Sender<Arc<ServerMessage>>, client_addr: SocketAddr) -> Self {
        Self {
            state: SessionState::Idle,
            room_id: None,
            sender,
            client_addr,
            connected_at: Instant::now(),
        }
    }
}

/// Every live client keyed by its connection handle.
///
/// Lives inside the match lock together with the queue and room table, so a
/// record and the collections that reference it always change together.
#[derive(Debug, Default)]
pub(crate) struct ConnectionRegistry {
    clients: HashMap<ClientId, ClientConnection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, client_id: ClientId, connection: ClientConnection) {
        self.clients.insert(client_id, connection);
    }

    pub fn get(&self, client_id: &ClientId) -> Option<&ClientConnection> {
        self.clients.get(client_id)
    }

    pub fn get_mut(&mut self, client_id: &ClientId) -> Option<&mut ClientConnection> {
        self.clients.get_mut(client_id)
    }

    pub fn contains(&self, client_id: &ClientId) -> bool {
        self.clients.contains_key(client_id)
    }

    pub fn remove(&mut self, client_id: &ClientId) -> Option<ClientConnection> {
        self.clients.remove(client_id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Queue a message on the client's outbound channel without blocking.
    ///
    /// Returns false when the client is unknown or its channel is full or closed;
    /// the message is dropped in every such case.
    pub fn deliver(
        &self,
        client_id: &ClientId,
        message: ServerMessage,
        metrics: &ServerMetrics,
    ) -> bool {
        let Some(connection) = self.clients.get(client_id) else {
            debug!(%client_id, "Client not registered, message not sent");
            return false;
        };

        match connection.sender.try_send(Arc::new(message)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                metrics.increment_websocket_messages_dropped();
                warn!(%client_id, "Outbound queue full, message dropped");
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!(%client_id, "Outbound channel closed, message dropped");
                false
            }
        }
    }
}

/// Per-IP connection accounting, kept outside the match lock.
pub(crate) struct IpConnectionLimiter {
    connections_per_ip: DashMap<IpAddr, usize>,
    max_connections_per_ip: usize,
}

impl IpConnectionLimiter {
    pub fn new(max_connections_per_ip: usize) -> Self {
        Self {
            connections_per_ip: DashMap::new(),
            max_connections_per_ip,
        }
    }

    pub fn limit(&self) -> usize {
        self.max_connections_per_ip
    }

    /// Reserve a slot for `ip`. On refusal, returns the current count.
    pub fn try_reserve(&self, ip: IpAddr) -> Result<usize, usize> {
        match self.connections_per_ip.entry(ip) {
            dashmap::mapref::entry::Entry::Occupied(mut entry) => {
                let current = *entry.get();
                if current >= self.max_connections_per_ip {
                    Err(current)
                } else {
                    let count = entry.get_mut();
                    *count += 1;
                    Ok(*count)
                }
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                if self.max_connections_per_ip == 0 {
                    Err(0)
                } else {
                    entry.insert(1);
                    Ok(1)
                }
            }
        }
    }

    /// Count a connection without enforcing the limit (test clients).
    pub fn reserve_unbounded(&self, ip: IpAddr) -> usize {
        let mut entry = self.connections_per_ip.entry(ip).or_insert(0);
        *entry += 1;
        *entry
    }

    pub fn release(&self, ip: IpAddr) {
        if let Some(mut entry) = self.connections_per_ip.get_mut(&ip) {
            if *entry > 1 {
                *entry -= 1;
                return;
            }
        }
        self.connections_per_ip.remove(&ip);
    }

    pub fn current(&self, ip: &IpAddr) -> usize {
        self.connections_per_ip
            .get(ip)
            .map(|entry| *entry.value())
            .unwrap_or(0)
    }
}
