//! Default value functions for configuration fields.
//!
//! Used by serde's `#[serde(default = ...)]` attributes throughout the
//! configuration tree, grouped by section.

use super::logging::LogFormat;

// =============================================================================
// Port & Root Config
// =============================================================================

pub const fn default_port() -> u16 {
    3000
}

// =============================================================================
// Server Defaults
// =============================================================================

pub const fn default_max_connections_per_ip() -> usize {
    10
}

pub const fn default_outbound_queue_capacity() -> usize {
    64
}

// =============================================================================
// Logging Defaults
// =============================================================================

pub fn default_log_dir() -> String {
    "logs".to_string()
}

pub fn default_log_filename() -> String {
    "pairup.log".to_string()
}

pub const fn default_enable_file_logging() -> bool {
    false
}

pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

// =============================================================================
// Security Defaults
// =============================================================================

pub fn default_cors_origins() -> String {
    "*".to_string()
}

pub const fn default_require_metrics_auth() -> bool {
    false
}

pub const fn default_max_message_size() -> usize {
    65536 // 64KB
}
