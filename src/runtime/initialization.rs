//! # Initialization
//!
//! Process setup shared by every controller: rustls crypto provider,
//! tracing, metrics registration, the probe server and the Kubernetes client.

use crate::config::ControllerConfig;
use crate::observability;
use crate::server::{start_server, ServerState};
use anyhow::{anyhow, Context, Result};
use kube::Client;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub struct InitializationResult {
    pub client: Client,
    pub server_state: Arc<ServerState>,
}

impl fmt::Debug for InitializationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitializationResult")
            .field("server_state", &self.server_state)
            .finish_non_exhaustive()
    }
}

pub async fn initialize(config: &ControllerConfig) -> Result<InitializationResult> {
    // Must run before anything opens a TLS connection
    install_crypto_provider()?;

    init_tracing(config);

    info!("Starting AWS provider");
    info!(
        "Build info: version={}, datetime={}, git_hash={}",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );
    info!(
        "Configuration: poll={}s, max_reconcile_rate={}, metrics_port={}",
        config.poll_interval_secs, config.max_reconcile_rate, config.metrics_port
    );

    observability::register_metrics()?;

    let server_state = Arc::new(ServerState::default());
    let server_state_clone = Arc::clone(&server_state);
    let port = config.metrics_port;
    tokio::spawn(async move {
        if let Err(e) = start_server(port, server_state_clone).await {
            error!("HTTP server error: {}", e);
        }
    });

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;

    Ok(InitializationResult {
        client,
        server_state,
    })
}

/// `RUST_LOG` wins over the configured level
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("provider_aws={}", level.to_lowercase()).into())
}

fn init_tracing(config: &ControllerConfig) {
    let filter = env_filter(&config.log_level);
    if config.json_logs() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn install_crypto_provider() -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_installed| anyhow!("Failed to install rustls crypto provider"))
}
