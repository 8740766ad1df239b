//! CORS development proxy binary.
//!
//! Loads configuration (file + CLI overrides), initializes logging, binds
//! the listener, and serves until Ctrl+C.

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use cors_proxy::config::{load_config, validate_config, ProxyConfig};
use cors_proxy::http::HttpServer;
use cors_proxy::observability::logging;
use cors_proxy::Shutdown;

#[derive(Parser)]
#[command(name = "cors-proxy", version)]
#[command(about = "CORS-rewriting development proxy for a single upstream origin")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (e.g. 0.0.0.0:8080), overrides the config file.
    #[arg(short, long)]
    listen: Option<String>,

    /// Upstream base URL, overrides the config file.
    #[arg(short, long)]
    upstream: Option<String>,

    /// Allowed CORS origin; repeat for multiple. Replaces the configured list.
    #[arg(short, long = "origin")]
    origins: Vec<String>,

    /// Image fetch timeout in seconds.
    #[arg(long)]
    fetch_timeout: Option<u64>,

    /// Disable the image fetch endpoint.
    #[arg(long)]
    no_fetch: bool,
}

impl Cli {
    fn into_config(self) -> Result<ProxyConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ProxyConfig::default(),
        };

        if let Some(listen) = self.listen {
            config.listener.bind_address = listen;
        }
        if let Some(upstream) = self.upstream {
            config.upstream.base_url = upstream;
        }
        if !self.origins.is_empty() {
            config.cors.allowed_origins = self.origins;
        }
        if let Some(timeout) = self.fetch_timeout {
            config.fetch.timeout_secs = timeout;
        }
        if self.no_fetch {
            config.fetch.enabled = false;
        }

        // Overrides may have invalidated a previously valid config; check
        // the merged result as a whole.
        if let Err(errors) = validate_config(&config) {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(joined.into());
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        path_prefix = %config.upstream.path_prefix,
        fetch_enabled = config.fetch.enabled,
        allowed_origins = config.cors.allowed_origins.len(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
