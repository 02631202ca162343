// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tokenpay serve` implementation.
//!
//! Opens the ledger, builds the receipt verifier and the purchase service,
//! and runs the gateway until SIGINT or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use tokenpay_config::TokenpayConfig;
use tokenpay_core::{ProviderAdapter, StorageAdapter, TokenpayError};
use tokenpay_gateway::{GatewayState, ServerConfig};
use tokenpay_purchase::PurchaseService;
use tokenpay_storage::SqliteStorage;
use tokenpay_verifier::HttpProviderAdapter;
use tracing::{info, warn};

/// Runs the gateway until a shutdown signal arrives.
pub async fn run_serve(config: TokenpayConfig) -> Result<(), TokenpayError> {
    info!(
        database_path = %config.storage.database_path,
        verifier = %config.verifier.base_url,
        "starting tokenpay"
    );

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let verifier = Arc::new(HttpProviderAdapter::new(&config.verifier)?);
    let service = Arc::new(build_service(&config, verifier, storage.clone()));

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
        bearer_token: config.gateway.bearer_token.clone(),
        max_concurrent_requests: config.gateway.max_concurrent_requests,
    };
    let served =
        tokenpay_gateway::start_server(&server_config, GatewayState::new(service), shutdown_signal())
            .await;

    storage.close().await?;
    info!("tokenpay serve shutdown complete");
    served
}

/// Wires the purchase service from config and the two adapters.
pub fn build_service(
    config: &TokenpayConfig,
    provider: Arc<dyn ProviderAdapter>,
    storage: Arc<dyn StorageAdapter>,
) -> PurchaseService {
    PurchaseService::new(
        provider,
        storage,
        config.defaults.to_user_config(),
        Duration::from_secs(config.verifier.timeout_secs),
    )
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
                    _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                ctrl_c.await;
                info!("received SIGINT (Ctrl+C), initiating shutdown");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
        info!("received Ctrl+C, initiating shutdown");
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so that `tokenpay verify` keeps stdout for JSON.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tokenpay={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
