// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tokenpay_core::TokenpayError;
use tokenpay_purchase::PurchaseService;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub service: Arc<PurchaseService>,
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

impl GatewayState {
    pub fn new(service: Arc<PurchaseService>) -> Self {
        Self {
            service,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Gateway server configuration (mirrors `GatewayConfig` from tokenpay-config).
#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Bearer token for user routes (None = user routes disabled).
    pub bearer_token: Option<String>,
    pub max_concurrent_requests: usize,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .finish()
    }
}

/// Builds the application router.
///
/// - GET /health, GET /v1/packages, POST /v1/verify (no auth)
/// - POST /v1/purchases, GET /v1/tokens, GET|PUT /v1/config (user auth)
pub fn router(config: &ServerConfig, state: GatewayState) -> Router {
    let auth = AuthConfig {
        bearer_token: config.bearer_token.clone(),
    };

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/packages", get(handlers::get_packages))
        .route("/v1/verify", post(handlers::post_verify))
        .with_state(state.clone());

    let user_routes = Router::new()
        .route("/v1/purchases", post(handlers::post_purchase))
        .route("/v1/tokens", get(handlers::get_tokens))
        .route(
            "/v1/config",
            get(handlers::get_config).put(handlers::put_config),
        )
        .route_layer(axum_middleware::from_fn_with_state(auth, auth_middleware))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .layer(ConcurrencyLimitLayer::new(config.max_concurrent_requests.max(1)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds to `host:port` and serves until `shutdown` resolves.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), TokenpayError> {
    if config.bearer_token.is_none() {
        tracing::warn!("no gateway bearer token configured; user routes will reject every request");
    }
    let app = router(config, state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TokenpayError::Config(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| TokenpayError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
