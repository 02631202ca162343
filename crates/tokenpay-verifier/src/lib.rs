// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Receipt-lookup provider adapter for Tokenpay.
//!
//! This crate implements [`ProviderAdapter`] over the HTTP receipt-lookup API
//! and normalizes each provider's answer into a [`NormalizedReceipt`].

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use tokenpay_config::model::VerifierConfig;
use tokenpay_core::{
    AdapterType, HealthStatus, NormalizedReceipt, PluginAdapter, Provider, ProviderAdapter,
    TokenpayError, VerificationOutcome, VerificationRequest,
};
use tracing::{debug, info};

use crate::client::{LookupResponse, VerifierClient};
use crate::types::WireReceipt;

/// [`ProviderAdapter`] backed by the receipt-lookup HTTP API.
pub struct HttpProviderAdapter {
    client: VerifierClient,
}

impl HttpProviderAdapter {
    /// Creates the adapter from the `[verifier]` config section.
    ///
    /// The API key is required; there is no anonymous mode.
    pub fn new(config: &VerifierConfig) -> Result<Self, TokenpayError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| SecretString::from(k.to_string()))
            .ok_or_else(|| {
                TokenpayError::Config(
                    "verifier.api_key is required (set TOKENPAY_VERIFIER_API_KEY)".into(),
                )
            })?;

        let client = VerifierClient::new(
            &api_key,
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "receipt verifier initialized");
        Ok(Self { client })
    }
}

#[async_trait]
impl PluginAdapter for HttpProviderAdapter {
    fn name(&self) -> &str {
        "http-verifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, TokenpayError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TokenpayError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for HttpProviderAdapter {
    async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationOutcome, TokenpayError> {
        match self.client.lookup(request).await? {
            LookupResponse::Found(wire) => {
                let receipt = normalize(request, wire)?;
                debug!(
                    provider = %receipt.provider,
                    reference = %receipt.reference,
                    amount = receipt.amount,
                    "receipt normalized"
                );
                Ok(VerificationOutcome::Verified(receipt))
            }
            LookupResponse::Rejected(reason) => Ok(VerificationOutcome::Failed { reason }),
        }
    }
}

/// Maps the wire receipt onto the common shape, keeping only the fields the
/// given provider is known to report.
pub fn normalize(
    request: &VerificationRequest,
    wire: WireReceipt,
) -> Result<NormalizedReceipt, TokenpayError> {
    let provider = request.provider();
    let amount = wire.amount.ok_or_else(|| TokenpayError::Provider {
        message: format!("{provider} receipt has no amount"),
        source: None,
    })?;

    let reference = wire
        .reference
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| request.reference().to_string());
    let mut receipt =
        NormalizedReceipt::new(provider, reference, amount, wire.txn_date.unwrap_or_default());
    if let Some(currency) = wire.currency.filter(|c| !c.trim().is_empty()) {
        receipt.currency = currency;
    }
    receipt.payer_name = wire.payer_name;
    receipt.receiver_name = wire.receiver_name;

    match provider {
        Provider::Telebirr => {
            receipt.payer_phone = wire.payer_phone;
            receipt.receiver_account = wire.receiver_account;
            receipt.status = wire.status;
            receipt.status_text = wire.status_text;
            receipt.total_amount = wire.total_amount;
            receipt.service_fee = wire.service_fee;
            receipt.service_fee_vat = wire.service_fee_vat;
        }
        Provider::Cbe => {
            receipt.payer_account = wire.payer_account;
            receipt.receiver_account = wire.receiver_account;
            receipt.reason = wire.reason;
        }
        Provider::Abyssinia => {
            receipt.payer_account = wire.payer_account;
            receipt.reason = wire.reason;
        }
    }
    Ok(receipt)
}
