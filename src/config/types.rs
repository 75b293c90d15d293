//! Root configuration types.

use super::defaults::default_port;
use super::logging::LoggingConfig;
use super::security::SecurityConfig;
use super::server::ServerConfig;
use serde::{Deserialize, Serialize};

/// Root configuration struct for Pairup.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            server: ServerConfig::default(),
            security: SecurityConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Broker settings derived from the loaded configuration.
    #[must_use]
    pub fn broker_config(&self) -> crate::server::ServerConfig {
        crate::server::ServerConfig {
            max_connections_per_ip: self.server.max_connections_per_ip,
            max_message_size: self.security.max_message_size,
            outbound_queue_capacity: self.server.outbound_queue_capacity,
            require_metrics_auth: self.security.require_metrics_auth,
            metrics_auth_token: self.security.metrics_auth_token.clone(),
        }
    }
}
