//! Configuration module for Pairup.
//!
//! Configuration is a JSON document layered from several sources, with
//! per-field environment overrides on top and compiled defaults underneath.
//!
//! # Module Structure
//!
//! - [`crate::config::types`]: Root `Config` struct
//! - [`server`]: Connection admission and delivery settings
//! - [`security`]: CORS, frame size and metrics auth
//! - [`logging`]: Logging configuration
//! - [`crate::config::loader`]: Configuration loading functions
//! - [`crate::config::validation`]: Configuration validation functions
//! - [`crate::config::defaults`]: Default value functions

pub mod defaults;
pub mod loader;
pub mod logging;
pub mod security;
pub mod server;
pub mod types;
pub mod validation;

pub use loader::load;

pub use logging::{LogFormat, LogLevel, LogRotation, LoggingConfig};

pub use security::SecurityConfig;

pub use server::ServerConfig;

pub use types::Config;

pub use validation::{is_production_mode, validate_config_security};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();

        assert_eq!(config.port, 3000);
        assert_eq!(config.server.max_connections_per_ip, 10);
        assert_eq!(config.server.outbound_queue_capacity, 64);

        assert_eq!(config.security.cors_origins, "*");
        assert_eq!(config.security.max_message_size, 65536);
        assert!(!config.security.require_metrics_auth);
        assert!(config.security.metrics_auth_token.is_none());

        assert_eq!(config.logging.dir, "logs");
        assert_eq!(config.logging.filename, "pairup.log");
        assert_eq!(config.logging.rotation, LogRotation::Daily);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(!config.logging.enable_file_logging);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(config.port, deserialized.port);
        assert_eq!(
            config.server.outbound_queue_capacity,
            deserialized.server.outbound_queue_capacity
        );
        assert_eq!(
            config.security.max_message_size,
            deserialized.security.max_message_size
        );
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "port": 9000, "security": { "max_message_size": 1024 } }"#)
                .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.security.max_message_size, 1024);
        assert_eq!(config.security.cors_origins, "*");
        assert_eq!(config.server.max_connections_per_ip, 10);
    }

    #[test]
    fn test_log_level_parsing_is_lenient() {
        let config: LoggingConfig = serde_json::from_str(r#"{ "level": "WARNING" }"#).unwrap();
        assert_eq!(config.level, Some(LogLevel::Warn));

        let config: LoggingConfig = serde_json::from_str(r#"{ "level": "loud" }"#).unwrap();
        assert_eq!(config.level, None);

        let config: LoggingConfig =
            serde_json::from_str(r#"{ "level": 3, "format": "text" }"#).unwrap();
        assert_eq!(config.level, None);
        assert_eq!(config.format, LogFormat::Text);
    }

    #[test]
    fn test_log_rotation_parsing() {
        let config: LoggingConfig = serde_json::from_str(r#"{ "rotation": "hourly" }"#).unwrap();
        assert_eq!(config.rotation, LogRotation::Hourly);
        assert_eq!(config.filename, "pairup.log");

        let result: Result<LoggingConfig, _> = serde_json::from_str(r#"{ "rotation": "weekly" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Trace.to_string(), "trace");
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert_eq!(LogLevel::Info.to_string(), "info");
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[test]
    fn test_broker_config_mapping() {
        let mut config = Config::default();
        config.server.max_connections_per_ip = 2;
        config.server.outbound_queue_capacity = 8;
        config.security.max_message_size = 4096;
        config.security.require_metrics_auth = true;
        config.security.metrics_auth_token = Some("secret-token-value".to_string());

        let broker = config.broker_config();
        assert_eq!(broker.max_connections_per_ip, 2);
        assert_eq!(broker.outbound_queue_capacity, 8);
        assert_eq!(broker.max_message_size, 4096);
        assert!(broker.require_metrics_auth);
        assert_eq!(
            broker.metrics_auth_token.as_deref(),
            Some("secret-token-value")
        );
    }

    #[test]
    fn test_validation_requires_metrics_token() {
        let mut config = Config::default();
        config.security.require_metrics_auth = true;
        assert!(validate_config_security(&config).is_err());

        config.security.metrics_auth_token = Some("   ".to_string());
        assert!(validate_config_security(&config).is_err());

        config.security.metrics_auth_token = Some("0123456789abcdef0123456789abcdef".to_string());
        assert!(validate_config_security(&config).is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_capacities() {
        let mut config = Config::default();
        config.server.outbound_queue_capacity = 0;
        assert!(validate_config_security(&config).is_err());

        let mut config = Config::default();
        config.server.max_connections_per_ip = 0;
        assert!(validate_config_security(&config).is_err());

        let mut config = Config::default();
        config.security.max_message_size = 0;
        assert!(validate_config_security(&config).is_err());
    }
}
