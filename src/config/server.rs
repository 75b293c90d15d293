//! Broker behavior configuration.

use super::defaults::{default_max_connections_per_ip, default_outbound_queue_capacity};
use serde::{Deserialize, Serialize};

/// Connection admission and delivery settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Maximum concurrent connections from a single IP address
    #[serde(default = "default_max_connections_per_ip")]
    pub max_connections_per_ip: usize,
    /// Messages buffered per client before new ones are dropped
    #[serde(default = "default_outbound_queue_capacity")]
    pub outbound_queue_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_connections_per_ip: default_max_connections_per_ip(),
            outbound_queue_capacity: default_outbound_queue_capacity(),
        }
    }
}
