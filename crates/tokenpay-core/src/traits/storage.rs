// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the receipt ledger.

use async_trait::async_trait;

use crate::error::TokenpayError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CreditOutcome, NewReceipt, Provider, ReceiptRecord, UserVerificationConfig};

/// Adapter for the persistence backend.
///
/// Implementations must enforce uniqueness of `(provider, reference)` in the
/// store itself; the purchase flow's pre-flight lookup is only advisory.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), TokenpayError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), TokenpayError>;

    /// Point lookup of a receipt by its unique key.
    async fn find_receipt(
        &self,
        provider: Provider,
        reference: &str,
    ) -> Result<Option<ReceiptRecord>, TokenpayError>;

    /// Stored verification settings for a user, if any.
    async fn get_user_config(
        &self,
        user_id: &str,
    ) -> Result<Option<UserVerificationConfig>, TokenpayError>;

    /// Insert or partially update a user's settings. `None` fields keep
    /// their stored value. Returns the row as stored.
    async fn upsert_user_config(
        &self,
        user_id: &str,
        config: &UserVerificationConfig,
    ) -> Result<UserVerificationConfig, TokenpayError>;

    /// Current token balance; 0 for unknown users.
    async fn token_balance(&self, user_id: &str) -> Result<i64, TokenpayError>;

    /// Insert the receipt and increment the owner's balance in one transaction.
    async fn record_and_credit(&self, receipt: &NewReceipt) -> Result<CreditOutcome, TokenpayError>;
}
