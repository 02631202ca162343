// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by adapters, the purchase flow, and the gateway.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
}

/// A payment provider whose receipts can be looked up.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Provider {
    /// Telebirr mobile money.
    Telebirr,
    /// Commercial Bank of Ethiopia.
    Cbe,
    /// Bank of Abyssinia.
    Abyssinia,
}

impl Provider {
    /// All supported providers.
    pub const ALL: [Provider; 3] = [Provider::Telebirr, Provider::Cbe, Provider::Abyssinia];

    /// Lower-case identifier used on the wire and in the receipts table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Telebirr => "telebirr",
            Provider::Cbe => "cbe",
            Provider::Abyssinia => "abyssinia",
        }
    }

    /// Whether the provider is a bank whose lookup is scoped by an account suffix.
    pub fn is_bank(&self) -> bool {
        matches!(self, Provider::Cbe | Provider::Abyssinia)
    }
}

/// A receipt lookup, one variant per provider.
///
/// Telebirr needs only the reference; the bank lookups also need the
/// account suffix that scopes the query to the receiving account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum VerificationRequest {
    Telebirr { reference: String },
    Cbe { reference: String, suffix: String },
    Abyssinia { reference: String, suffix: String },
}

impl VerificationRequest {
    /// Build a request for `provider`. The suffix is ignored for Telebirr.
    pub fn new(provider: Provider, reference: impl Into<String>, suffix: Option<String>) -> Self {
        let reference = reference.into();
        match provider {
            Provider::Telebirr => Self::Telebirr { reference },
            Provider::Cbe => Self::Cbe {
                reference,
                suffix: suffix.unwrap_or_default(),
            },
            Provider::Abyssinia => Self::Abyssinia {
                reference,
                suffix: suffix.unwrap_or_default(),
            },
        }
    }

    pub fn provider(&self) -> Provider {
        match self {
            Self::Telebirr { .. } => Provider::Telebirr,
            Self::Cbe { .. } => Provider::Cbe,
            Self::Abyssinia { .. } => Provider::Abyssinia,
        }
    }

    pub fn reference(&self) -> &str {
        match self {
            Self::Telebirr { reference }
            | Self::Cbe { reference, .. }
            | Self::Abyssinia { reference, .. } => reference,
        }
    }

    /// The account suffix, for the bank variants.
    pub fn suffix(&self) -> Option<&str> {
        match self {
            Self::Telebirr { .. } => None,
            Self::Cbe { suffix, .. } | Self::Abyssinia { suffix, .. } => Some(suffix),
        }
    }
}

/// A provider receipt in the shape shared by all three providers.
///
/// Exists only for the duration of one verification call; the purchase
/// path persists its JSON form as the receipt's audit blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedReceipt {
    pub provider: Provider,
    pub reference: String,
    pub amount: f64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_account: Option<String>,
    pub txn_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_fee: Option<f64>,
    #[serde(
        default,
        rename = "serviceFeeVAT",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_fee_vat: Option<f64>,
}

impl NormalizedReceipt {
    /// Minimal receipt with only the mandatory fields set.
    pub fn new(
        provider: Provider,
        reference: impl Into<String>,
        amount: f64,
        txn_date: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            reference: reference.into(),
            amount,
            currency: "ETB".to_string(),
            payer_name: None,
            payer_phone: None,
            payer_account: None,
            receiver_name: None,
            receiver_account: None,
            txn_date: txn_date.into(),
            status: None,
            status_text: None,
            reason: None,
            total_amount: None,
            service_fee: None,
            service_fee_vat: None,
        }
    }

    /// The status recorded on the persisted receipt: `status`, else `statusText`.
    pub fn effective_status(&self) -> Option<&str> {
        self.status.as_deref().or(self.status_text.as_deref())
    }
}

/// Result of one provider lookup that reached the upstream.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    /// The provider confirmed the reference.
    Verified(NormalizedReceipt),
    /// The provider did not confirm it (not found, invalid, wrong account, ...).
    Failed { reason: String },
}

/// Per-user verification settings, all optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserVerificationConfig {
    #[serde(default)]
    pub platform_owner_full_name: Option<String>,
    #[serde(default)]
    pub cbe_account_suffix: Option<String>,
    #[serde(default)]
    pub abyssinia_account_suffix: Option<String>,
    #[serde(default)]
    pub telebirr_number: Option<String>,
    #[serde(default)]
    pub cbe_account_number: Option<String>,
    #[serde(default)]
    pub abyssinia_account_number: Option<String>,
}

/// A verified receipt ready to be written together with its token credit.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReceipt {
    pub provider: Provider,
    pub reference: String,
    pub amount: f64,
    pub receiver_name: String,
    pub payer_name: String,
    pub status: Option<String>,
    /// JSON audit blob.
    pub raw_data: String,
    pub user_id: String,
    pub package_id: u32,
    pub credited_tokens: i64,
}

/// A persisted receipt row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub id: String,
    pub provider: Provider,
    pub reference: String,
    pub amount: f64,
    pub receiver_name: String,
    pub payer_name: String,
    pub status: Option<String>,
    pub raw_data: String,
    pub user_id: String,
    pub package_id: u32,
    pub credited_tokens: i64,
    pub created_at: String,
}

/// What the credit transaction did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditOutcome {
    /// Receipt stored and balance incremented; carries the new balance.
    Credited { balance: i64 },
    /// `(provider, reference)` already exists; nothing was written.
    DuplicateReference,
}
