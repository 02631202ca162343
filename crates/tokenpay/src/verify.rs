// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tokenpay verify` implementation.

use tokenpay_config::TokenpayConfig;
use tokenpay_core::{Provider, ProviderAdapter, VerificationOutcome};
use tokenpay_purchase::CheckRequest;
use tokenpay_verifier::HttpProviderAdapter;

/// Looks one receipt up and returns it as pretty JSON. The error is a
/// message for the terminal.
pub async fn run_verify(
    config: &TokenpayConfig,
    provider: Provider,
    reference: String,
    suffix: Option<String>,
) -> Result<String, String> {
    let lookup = CheckRequest {
        provider,
        reference,
        suffix,
    }
    .into_lookup()
    .map_err(|e| e.to_string())?;

    let adapter = HttpProviderAdapter::new(&config.verifier).map_err(|e| e.to_string())?;
    match adapter.verify(&lookup).await.map_err(|e| e.to_string())? {
        VerificationOutcome::Verified(receipt) => {
            serde_json::to_string_pretty(&receipt).map_err(|e| e.to_string())
        }
        VerificationOutcome::Failed { reason } => Err(reason),
    }
}
