// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the receipt-lookup API.
//!
//! Provides [`VerifierClient`], which builds the per-provider request,
//! authenticates with `x-api-key`, and sorts upstream answers into
//! "found", "rejected" and fatal errors.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tokenpay_core::{TokenpayError, VerificationRequest};
use tracing::{debug, warn};

use crate::types::{AbyssiniaLookup, CbeLookup, LookupEnvelope, TelebirrLookup, WireReceipt};

/// Message used when the upstream rejects without saying why.
pub const DEFAULT_FAILURE: &str = "Verification failed";

/// What the lookup API said about one reference.
#[derive(Debug, Clone)]
pub enum LookupResponse {
    /// The provider confirmed the receipt.
    Found(WireReceipt),
    /// The provider answered but did not confirm it.
    Rejected(String),
}

/// HTTP client for the receipt-lookup API.
#[derive(Debug, Clone)]
pub struct VerifierClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl VerifierClient {
    /// Creates a client for the lookup API at `base_url`.
    pub fn new(
        api_key: &SecretString,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TokenpayError> {
        let mut key = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|e| TokenpayError::Config(format!("invalid API key header value: {e}")))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", key);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| TokenpayError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Looks up one receipt.
    ///
    /// Transport failures, timeouts, 5xx answers, refusals of our own
    /// credentials or quota (401, 403, 407, 429) and malformed bodies are
    /// errors; everything else is a [`LookupResponse`].
    pub async fn lookup(
        &self,
        request: &VerificationRequest,
    ) -> Result<LookupResponse, TokenpayError> {
        let builder = match request {
            VerificationRequest::Telebirr { reference } => self
                .client
                .post(self.endpoint("verify-telebirr"))
                .json(&TelebirrLookup { reference }),
            VerificationRequest::Cbe { reference, suffix } => self
                .client
                .post(self.endpoint("verify-cbe"))
                .json(&CbeLookup {
                    reference,
                    account_suffix: suffix,
                }),
            VerificationRequest::Abyssinia { reference, suffix } => self
                .client
                .post(self.endpoint("verify-abyssinia"))
                .json(&AbyssiniaLookup { reference, suffix }),
        };

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        debug!(status = %status, provider = %request.provider(), "lookup response received");

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        let envelope = serde_json::from_str::<LookupEnvelope>(&body);

        if status.is_success() {
            let envelope = envelope.map_err(|e| TokenpayError::Provider {
                message: format!("failed to parse lookup response: {e}"),
                source: Some(Box::new(e)),
            })?;
            return match (envelope.ok, envelope.data) {
                (true, Some(data)) => Ok(LookupResponse::Found(data)),
                (true, None) => Err(TokenpayError::Provider {
                    message: "lookup response has ok=true but no data".into(),
                    source: None,
                }),
                (false, _) => Ok(LookupResponse::Rejected(failure_reason(envelope.error))),
            };
        }

        // Our key or our quota, not the user's reference.
        if is_service_fault(status) {
            warn!(status = %status, "lookup API refused the service");
            return Err(upstream_error(status, &body));
        }

        if let Ok(envelope) = envelope
            && !envelope.ok
            && status.is_client_error()
        {
            return Ok(LookupResponse::Rejected(failure_reason(envelope.error)));
        }

        if status.is_client_error() {
            return Ok(LookupResponse::Rejected(format!("{DEFAULT_FAILURE} ({status})")));
        }

        warn!(status = %status, "lookup API returned an error status");
        Err(upstream_error(status, &body))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn transport_error(&self, e: reqwest::Error) -> TokenpayError {
        if e.is_timeout() {
            TokenpayError::Timeout {
                duration: self.timeout,
            }
        } else {
            TokenpayError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }
}

fn is_service_fault(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::UNAUTHORIZED
            | StatusCode::FORBIDDEN
            | StatusCode::PROXY_AUTHENTICATION_REQUIRED
            | StatusCode::TOO_MANY_REQUESTS
    )
}

fn failure_reason(error: Option<String>) -> String {
    error
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_FAILURE.to_string())
}

fn upstream_error(status: StatusCode, body: &str) -> TokenpayError {
    let snippet: String = body.chars().take(200).collect();
    TokenpayError::Provider {
        message: format!("lookup API returned {status}: {snippet}"),
        source: None,
    }
}
