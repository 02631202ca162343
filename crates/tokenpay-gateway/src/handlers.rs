// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;

use tokenpay_core::{HealthStatus, NormalizedReceipt, UserVerificationConfig};
use tokenpay_purchase::{CheckRequest, PACKAGES, Package, PurchaseOutcome, PurchaseRequest};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok", "degraded" or "unhealthy".
    pub status: String,
    /// Storage health detail.
    pub storage: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the gateway started.
    pub uptime_secs: u64,
}

/// Response body for GET /v1/packages.
#[derive(Debug, Serialize)]
pub struct PackagesResponse {
    pub packages: &'static [Package],
}

/// Response body for GET /v1/tokens.
#[derive(Debug, Serialize)]
pub struct TokensResponse {
    pub tokens: i64,
}

/// GET /health
///
/// Unauthenticated liveness probe. Answers 503 when storage is unhealthy.
pub async fn get_health(State(state): State<GatewayState>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status, storage) = match state.service.storage_health().await {
        HealthStatus::Healthy => (StatusCode::OK, "ok", "healthy".to_string()),
        HealthStatus::Degraded(detail) => (StatusCode::OK, "degraded", detail),
        HealthStatus::Unhealthy(detail) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", detail),
    };
    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            storage,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: state.start_time.elapsed().as_secs(),
        }),
    )
}

/// GET /v1/packages
pub async fn get_packages() -> Json<PackagesResponse> {
    Json(PackagesResponse {
        packages: &PACKAGES,
    })
}

/// POST /v1/verify
///
/// Read-only receipt lookup. Nothing is persisted.
pub async fn post_verify(
    State(state): State<GatewayState>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<NormalizedReceipt>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(state.service.check(request).await?))
}

/// POST /v1/purchases
pub async fn post_purchase(
    State(state): State<GatewayState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    payload: Result<Json<PurchaseRequest>, JsonRejection>,
) -> Result<Json<PurchaseOutcome>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(state.service.verify_and_credit(&user_id, request).await?))
}

/// GET /v1/tokens
pub async fn get_tokens(
    State(state): State<GatewayState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
) -> Result<Json<TokensResponse>, ApiError> {
    let tokens = state.service.get_tokens(&user_id).await?;
    Ok(Json(TokensResponse { tokens }))
}

/// GET /v1/config
///
/// Returns `null` when the user has never saved settings.
pub async fn get_config(
    State(state): State<GatewayState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
) -> Result<Json<Option<UserVerificationConfig>>, ApiError> {
    Ok(Json(state.service.get_config(&user_id).await?))
}

/// PUT /v1/config
pub async fn put_config(
    State(state): State<GatewayState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    payload: Result<Json<UserVerificationConfig>, JsonRejection>,
) -> Result<Json<UserVerificationConfig>, ApiError> {
    let Json(config) = payload?;
    Ok(Json(state.service.upsert_config(&user_id, config).await?))
}
