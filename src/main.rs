#![cfg_attr(not(test), deny(clippy::panic))]

use clap::Parser;
use pairup_server::config;
use pairup_server::logging;
use pairup_server::server::MatchmakingServer;
use pairup_server::websocket;
use std::net::SocketAddr;

/// Pairup -- in-memory WebSocket matchmaking and signaling for one-to-one sessions
#[derive(Parser, Debug)]
#[command(name = "pairup-server")]
#[command(about = "An in-memory WebSocket matchmaking and signaling broker for one-to-one sessions")]
#[command(version)]
struct Cli {
    /// Validate configuration and exit without starting the server.
    #[arg(long, short = 'c', conflicts_with = "print_config")]
    validate_config: bool,

    /// Print the loaded configuration to stdout (as JSON) and exit.
    #[arg(long, conflicts_with = "validate_config")]
    print_config: bool,

    /// Listen port; overrides the configured `port`.
    #[arg(long, short = 'p', env = "PAIRUP_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load();
    if let Some(port) = cli.port {
        cfg.port = port;
    }

    if cli.print_config {
        let json = serde_json::to_string_pretty(&cfg)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    // load() only reports validation problems; here they decide the exit code.
    let validation_result = config::validate_config_security(&cfg);

    if cli.validate_config {
        match validation_result {
            Ok(()) => {
                println!("Configuration validation passed");
                println!();
                println!("Configuration summary:");
                println!("  Port: {}", cfg.port);
                println!(
                    "  Max connections per IP: {}",
                    cfg.server.max_connections_per_ip
                );
                println!(
                    "  Outbound queue capacity: {}",
                    cfg.server.outbound_queue_capacity
                );
                println!("  Max message size: {}", cfg.security.max_message_size);
                println!(
                    "  Metrics auth required: {}",
                    cfg.security.require_metrics_auth
                );
                return Ok(());
            }
            Err(e) => {
                eprintln!("Configuration validation failed:\n{e}");
                std::process::exit(1);
            }
        }
    }

    validation_result?;

    let _log_guard = logging::init_with_config(&cfg.logging);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let server = MatchmakingServer::new(cfg.broker_config());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        cors_origins = %cfg.security.cors_origins,
        "Pairup server listening - WebSocket: /ws, Health: /health, Metrics: /metrics"
    );

    websocket::serve(listener, server, &cfg.security.cors_origins).await
}
