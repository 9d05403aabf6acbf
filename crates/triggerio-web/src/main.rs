//! Web server for the Triggerio analytics dashboard
#![forbid(unsafe_code)]

use clap::Parser;
use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};
use tracing::{info, warn};
use triggerio_core::Config;
use triggerio_web::build_app;

/// Triggerio analytics dashboard server
#[derive(Debug, Parser)]
#[command(name = "triggerio-dashboard", version, about)]
struct Cli {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level, overriding the configuration
    #[arg(long)]
    log_level: Option<String>,

    /// Bind address, overriding the configuration
    #[arg(long)]
    host: Option<String>,

    /// Port, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Configuration errors are reported once logging is up
    let (mut config, load_error) = match Config::load_from(cli.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    triggerio_core::init_logging(&config.logging)?;
    if let Some(e) = load_error {
        warn!("Failed to load config: {}, using defaults", e);
    }

    let app = build_app(config.clone())?;

    let host: IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| format!("Invalid server host '{}': {}", config.server.host, e))?;
    let addr = SocketAddr::new(host, config.server.port);

    info!(
        backend = %config.api.base_url,
        auth_url = %config.auth.auth_url,
        "Starting Triggerio dashboard on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
