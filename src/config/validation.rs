//! Configuration validation functions.

use super::Config;

/// Reject configurations the server cannot run with and warn about weak ones.
pub fn validate_config_security(config: &Config) -> anyhow::Result<()> {
    if config.security.require_metrics_auth {
        let token_present = config
            .security
            .metrics_auth_token
            .as_ref()
            .is_some_and(|t| !t.trim().is_empty());

        if !token_present {
            anyhow::bail!(
                "\nCRITICAL: Metrics authentication is enabled but no token is configured!\n\
                 ===================================================================\n\
                 Configure a shared bearer token:\n\
                 export PAIRUP__SECURITY__METRICS_AUTH_TOKEN=\"$(openssl rand -hex 32)\"\n\
                 \n\
                 Or disable metrics auth:\n\
                 export PAIRUP__SECURITY__REQUIRE_METRICS_AUTH=false\n\
                 ===================================================================\n"
            );
        }

        if let Some(token) = &config.security.metrics_auth_token {
            if token.len() < 16 {
                eprintln!(
                    "\nWARNING: Metrics auth token is very short ({} chars).\n\
                     Recommended: At least 32 characters.\n",
                    token.len()
                );
            }
        }
    } else if is_production_mode() {
        eprintln!(
            "\nSECURITY WARNING: /metrics is publicly readable in production.\n\
             Set PAIRUP__SECURITY__REQUIRE_METRICS_AUTH=true and a token to protect it.\n"
        );
    }

    if config.server.max_connections_per_ip == 0 {
        anyhow::bail!("server.max_connections_per_ip must be greater than 0");
    }

    if config.server.outbound_queue_capacity == 0 {
        anyhow::bail!("server.outbound_queue_capacity must be greater than 0");
    }

    if config.security.max_message_size == 0 {
        anyhow::bail!("security.max_message_size must be greater than 0");
    }

    Ok(())
}

/// Detect if we're running in production mode.
///
/// Checks `PAIRUP__ENVIRONMENT`, then the generic `PRODUCTION` / `PROD` flags.
pub fn is_production_mode() -> bool {
    use std::env;

    if let Ok(mode) = env::var("PAIRUP__ENVIRONMENT") {
        let mode = mode.to_lowercase();
        return mode == "production" || mode == "prod";
    }

    env::var("PRODUCTION").is_ok() || env::var("PROD").is_ok()
}
