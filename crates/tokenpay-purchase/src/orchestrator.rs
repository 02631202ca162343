// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The purchase flow and its read-only siblings.
//!
//! [`PurchaseService::verify_and_credit`] runs
//! package → duplicate pre-check → config resolution → provider lookup →
//! policy → credit transaction, short-circuiting on the first rejection.
//! The pre-check only saves a provider call; the unique key in storage is
//! what guarantees a reference is credited once.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokenpay_core::fields::validate_user_config;
use tokenpay_core::{
    ConfigField, CreditOutcome, HealthStatus, NewReceipt, NormalizedReceipt, Provider,
    ProviderAdapter, StorageAdapter, TokenpayError, UserVerificationConfig, VerificationOutcome,
    VerificationRequest,
};
use tracing::{debug, error, info, warn};

use crate::error::PurchaseError;
use crate::packages::{Package, find_package};
use crate::policy::{Decision, decide};
use crate::resolve::{ConfigLayers, ResolvedConfig};

/// Shortest reference the providers accept.
pub const MIN_REFERENCE_LEN: usize = 5;

/// Body of a purchase call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub provider: Provider,
    pub reference: String,
    pub package_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ConfigOverride>,
}

/// Settings a caller may override for a single purchase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigOverride {
    #[serde(default)]
    pub platform_owner_full_name: Option<String>,
    #[serde(default)]
    pub cbe_account_suffix: Option<String>,
    #[serde(default)]
    pub abyssinia_account_suffix: Option<String>,
}

impl ConfigOverride {
    fn validate(&self) -> Result<(), PurchaseError> {
        if let Some(owner) = &self.platform_owner_full_name
            && owner.trim().is_empty()
        {
            return Err(PurchaseError::bad_request(
                "platformOwnerFullName must not be empty",
            ));
        }
        let suffixes = [
            (ConfigField::CbeAccountSuffix, &self.cbe_account_suffix),
            (ConfigField::AbyssiniaAccountSuffix, &self.abyssinia_account_suffix),
        ];
        for (field, value) in suffixes {
            if let Some(value) = value {
                field.validate(value).map_err(PurchaseError::BadRequest)?;
            }
        }
        Ok(())
    }

    fn to_user_config(&self) -> UserVerificationConfig {
        UserVerificationConfig {
            platform_owner_full_name: self.platform_owner_full_name.clone(),
            cbe_account_suffix: self.cbe_account_suffix.clone(),
            abyssinia_account_suffix: self.abyssinia_account_suffix.clone(),
            ..Default::default()
        }
    }
}

/// A successful purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOutcome {
    /// Tokens added by this purchase.
    pub credited: u32,
    /// Balance after the credit.
    pub tokens: i64,
    pub provider: Provider,
    pub reference: String,
}

/// Body of a read-only check. The suffix is optional here so that a missing
/// one is reported as a bad request rather than a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRequest {
    pub provider: Provider,
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl CheckRequest {
    /// Validates the input and builds the provider lookup.
    pub fn into_lookup(self) -> Result<VerificationRequest, PurchaseError> {
        let reference = validate_reference(&self.reference)?;
        let suffix = self
            .suffix
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if self.provider.is_bank() && suffix.is_none() {
            return Err(PurchaseError::bad_request(match self.provider {
                Provider::Cbe => "Account suffix is required",
                _ => "Suffix is required",
            }));
        }
        Ok(VerificationRequest::new(self.provider, reference, suffix))
    }
}

fn validate_reference(reference: &str) -> Result<String, PurchaseError> {
    let reference = reference.trim();
    if reference.chars().count() < MIN_REFERENCE_LEN {
        return Err(PurchaseError::bad_request(format!(
            "Reference must be at least {MIN_REFERENCE_LEN} characters"
        )));
    }
    Ok(reference.to_string())
}

/// Verifies receipts and credits tokens.
///
/// Holds no per-request state; clone the `Arc`s freely and share one
/// instance across request handlers.
pub struct PurchaseService {
    provider: Arc<dyn ProviderAdapter>,
    storage: Arc<dyn StorageAdapter>,
    defaults: UserVerificationConfig,
    provider_timeout: Duration,
}

impl PurchaseService {
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        storage: Arc<dyn StorageAdapter>,
        defaults: UserVerificationConfig,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            storage,
            defaults,
            provider_timeout,
        }
    }

    /// Verifies a receipt for `user_id` and credits the package's tokens.
    pub async fn verify_and_credit(
        &self,
        user_id: &str,
        request: PurchaseRequest,
    ) -> Result<PurchaseOutcome, PurchaseError> {
        let provider = request.provider;
        let reference = validate_reference(&request.reference)?;
        if request.package_id <= 0 {
            return Err(PurchaseError::bad_request("packageId must be a positive integer"));
        }
        if let Some(config) = &request.config {
            config.validate()?;
        }

        let Some(package) = find_package(request.package_id) else {
            warn!(package_id = request.package_id, "invalid package");
            return Err(PurchaseError::bad_request("Invalid package"));
        };
        info!(
            user_id,
            %provider,
            reference = %reference,
            package_id = package.id,
            "purchase started"
        );

        if self.storage.find_receipt(provider, &reference).await?.is_some() {
            warn!(%provider, reference = %reference, "duplicate reference detected");
            return Err(PurchaseError::duplicate());
        }

        let stored = self.storage.get_user_config(user_id).await?;
        let overrides = request.config.as_ref().map(ConfigOverride::to_user_config);
        let resolved = ConfigLayers {
            request: overrides.as_ref(),
            stored: stored.as_ref(),
            defaults: &self.defaults,
        }
        .resolve();
        debug!(
            owner_source = ?resolved.source(ConfigField::PlatformOwnerFullName),
            suffix = ?resolved.suffix_for(provider),
            "verification config resolved"
        );

        let lookup = build_lookup(provider, &reference, &resolved)?;
        let receipt = self.lookup(&lookup).await?;

        if let Decision::Reject(rejection) = decide(package, &receipt, &resolved) {
            warn!(%provider, reference = %reference, %rejection, "receipt rejected by policy");
            return Err(rejection.into());
        }

        let record = new_receipt(user_id, package, &reference, &receipt)?;
        match self.storage.record_and_credit(&record).await? {
            CreditOutcome::Credited { balance } => {
                info!(
                    user_id,
                    %provider,
                    reference = %reference,
                    credited = package.tokens,
                    balance,
                    "tokens credited"
                );
                Ok(PurchaseOutcome {
                    credited: package.tokens,
                    tokens: balance,
                    provider,
                    reference,
                })
            }
            CreditOutcome::DuplicateReference => {
                warn!(%provider, reference = %reference, "reference claimed concurrently");
                Err(PurchaseError::duplicate())
            }
        }
    }

    /// Looks a receipt up without persisting anything.
    pub async fn check(&self, request: CheckRequest) -> Result<NormalizedReceipt, PurchaseError> {
        let lookup = request.into_lookup()?;
        info!(provider = %lookup.provider(), reference = lookup.reference(), "read-only check");
        self.lookup(&lookup).await
    }

    pub async fn get_config(
        &self,
        user_id: &str,
    ) -> Result<Option<UserVerificationConfig>, PurchaseError> {
        Ok(self.storage.get_user_config(user_id).await?)
    }

    /// Validates and stores a user's settings. Blank fields are treated as
    /// absent and keep their stored value.
    pub async fn upsert_config(
        &self,
        user_id: &str,
        config: UserVerificationConfig,
    ) -> Result<UserVerificationConfig, PurchaseError> {
        let mut cleaned = UserVerificationConfig::default();
        for field in ConfigField::ALL {
            field.set(&mut cleaned, field.get(&config).map(str::to_string));
        }
        validate_user_config(&cleaned).map_err(|errors| PurchaseError::BadRequest(errors.join("; ")))?;

        let stored = self.storage.upsert_user_config(user_id, &cleaned).await?;
        info!(user_id, "verification config updated");
        Ok(stored)
    }

    pub async fn get_tokens(&self, user_id: &str) -> Result<i64, PurchaseError> {
        Ok(self.storage.token_balance(user_id).await?)
    }

    /// Health of the storage backend, for liveness probes.
    pub async fn storage_health(&self) -> HealthStatus {
        match self.storage.health_check().await {
            Ok(status) => status,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }

    async fn lookup(&self, request: &VerificationRequest) -> Result<NormalizedReceipt, PurchaseError> {
        let provider = request.provider();
        let outcome = tokio::time::timeout(self.provider_timeout, self.provider.verify(request))
            .await
            .map_err(|_| TokenpayError::Timeout {
                duration: self.provider_timeout,
            })
            .inspect_err(|_| error!(%provider, "receipt lookup timed out"))??;

        match outcome {
            VerificationOutcome::Verified(receipt) => Ok(receipt),
            VerificationOutcome::Failed { reason } => {
                warn!(%provider, reference = request.reference(), %reason, "verification failed");
                Err(PurchaseError::BadRequest(reason))
            }
        }
    }
}

fn build_lookup(
    provider: Provider,
    reference: &str,
    resolved: &ResolvedConfig,
) -> Result<VerificationRequest, PurchaseError> {
    let suffix = resolved.suffix_for(provider).map(str::to_string);
    if provider.is_bank() && suffix.is_none() {
        warn!(%provider, "no account suffix configured");
        return Err(PurchaseError::bad_request(format!(
            "No {provider} account suffix configured"
        )));
    }
    Ok(VerificationRequest::new(provider, reference, suffix))
}

fn new_receipt(
    user_id: &str,
    package: &Package,
    reference: &str,
    receipt: &NormalizedReceipt,
) -> Result<NewReceipt, TokenpayError> {
    let raw_data = serde_json::to_string(receipt)
        .map_err(|e| TokenpayError::Internal(format!("failed to serialize receipt: {e}")))?;
    Ok(NewReceipt {
        provider: receipt.provider,
        reference: reference.to_string(),
        amount: receipt.amount,
        receiver_name: receipt.receiver_name.clone().unwrap_or_default(),
        payer_name: receipt.payer_name.clone().unwrap_or_default(),
        status: receipt.effective_status().map(str::to_string),
        raw_data,
        user_id: user_id.to_string(),
        package_id: package.id,
        credited_tokens: i64::from(package.tokens),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_reference_is_rejected() {
        let err = validate_reference("  abcd ").unwrap_err();
        assert_eq!(err.client_message(), "Reference must be at least 5 characters");
        assert_eq!(validate_reference(" abcde ").unwrap(), "abcde");
    }

    #[test]
    fn check_request_requires_bank_suffix() {
        let request = CheckRequest {
            provider: Provider::Cbe,
            reference: "FT24330ABCDE".into(),
            suffix: Some("  ".into()),
        };
        let err = request.into_lookup().unwrap_err();
        assert_eq!(err.client_message(), "Account suffix is required");

        let request = CheckRequest {
            provider: Provider::Telebirr,
            reference: "CE1234ABCD".into(),
            suffix: None,
        };
        assert_eq!(
            request.into_lookup().unwrap(),
            VerificationRequest::Telebirr {
                reference: "CE1234ABCD".into()
            }
        );
    }

    #[test]
    fn override_suffix_formats_are_checked() {
        let bad = ConfigOverride {
            cbe_account_suffix: Some("1234".into()),
            ..Default::default()
        };
        assert_eq!(bad.validate().unwrap_err().client_message(), "CBE suffix must be 8 digits");

        let blank_owner = ConfigOverride {
            platform_owner_full_name: Some(" ".into()),
            ..Default::default()
        };
        assert!(blank_owner.validate().is_err());

        let good = ConfigOverride {
            platform_owner_full_name: Some("Abebe Kebede".into()),
            cbe_account_suffix: Some("12345678".into()),
            abyssinia_account_suffix: Some("54321".into()),
        };
        assert!(good.validate().is_ok());
    }

    #[test]
    fn bank_lookup_without_suffix_is_bad_request() {
        let err = build_lookup(Provider::Abyssinia, "FT24330ABCDE", &ResolvedConfig::default())
            .unwrap_err();
        assert_eq!(err.client_message(), "No abyssinia account suffix configured");
        assert!(build_lookup(Provider::Telebirr, "CE1234ABCD", &ResolvedConfig::default()).is_ok());
    }

    #[test]
    fn purchase_request_uses_camel_case() {
        let json = r#"{"provider":"cbe","reference":"FT24330ABCDE","packageId":2,
            "config":{"cbeAccountSuffix":"12345678"}}"#;
        let request: PurchaseRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.package_id, 2);
        assert_eq!(
            request.config.unwrap().cbe_account_suffix.as_deref(),
            Some("12345678")
        );
    }

    #[test]
    fn new_receipt_keeps_request_reference_and_effective_status() {
        let mut receipt = NormalizedReceipt::new(Provider::Telebirr, "UPSTREAM1", 50.0, "2026-01-01");
        receipt.status_text = Some("Completed".into());
        receipt.payer_name = Some("Sara".into());
        let package = find_package(1).unwrap();
        let record = new_receipt("user-1", package, "CE1234ABCD", &receipt).unwrap();
        assert_eq!(record.reference, "CE1234ABCD");
        assert_eq!(record.status.as_deref(), Some("Completed"));
        assert_eq!(record.receiver_name, "");
        assert_eq!(record.payer_name, "Sara");
        assert_eq!(record.credited_tokens, 50);
        assert!(record.raw_data.contains("\"statusText\":\"Completed\""));
    }
}
