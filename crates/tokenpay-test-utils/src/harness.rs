// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end purchase tests.
//!
//! `TestHarness` wires a [`FakeProvider`] and a temp-file SQLite ledger into
//! a [`PurchaseService`], and exposes the raw connection for assertions on
//! what was (or was not) written.

use std::sync::Arc;
use std::time::Duration;

use tokenpay_config::model::StorageConfig;
use tokenpay_core::{StorageAdapter, TokenpayError, UserVerificationConfig};
use tokenpay_purchase::PurchaseService;
use tokenpay_storage::SqliteStorage;
use tokenpay_storage::database::map_tr_err;

use crate::fake_provider::FakeProvider;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    provider: Option<FakeProvider>,
    defaults: UserVerificationConfig,
    provider_timeout: Duration,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            provider: None,
            defaults: UserVerificationConfig::default(),
            provider_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_provider(mut self, provider: FakeProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Process-wide fallback settings.
    pub fn with_defaults(mut self, defaults: UserVerificationConfig) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Build the harness, creating and migrating a fresh database.
    pub async fn build(self) -> Result<TestHarness, TokenpayError> {
        let temp_dir = tempfile::TempDir::new().map_err(TokenpayError::storage)?;
        let db_path = temp_dir.path().join("tokenpay-test.db");

        let storage = Arc::new(SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        }));
        storage.initialize().await?;

        let provider = Arc::new(self.provider.unwrap_or_default());
        let service = Arc::new(PurchaseService::new(
            provider.clone(),
            storage.clone(),
            self.defaults,
            self.provider_timeout,
        ));

        Ok(TestHarness {
            provider,
            storage,
            service,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete purchase stack over a temporary database.
pub struct TestHarness {
    /// The scripted provider.
    pub provider: Arc<FakeProvider>,
    /// SQLite storage (temp DB, removed on drop).
    pub storage: Arc<SqliteStorage>,
    /// The service under test.
    pub service: Arc<PurchaseService>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Number of rows in the receipts table.
    pub async fn receipt_count(&self) -> Result<i64, TokenpayError> {
        self.storage
            .db()?
            .connection()
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM receipts", [], |row| row.get(0)))
            .await
            .map_err(map_tr_err)
    }

    /// Current balance, read straight from storage.
    pub async fn balance(&self, user_id: &str) -> Result<i64, TokenpayError> {
        self.storage.token_balance(user_id).await
    }

    /// Makes every write to `users` abort, so the credit transaction fails
    /// after its receipt insert.
    pub async fn fail_balance_updates(&self) -> Result<(), TokenpayError> {
        self.storage
            .db()?
            .connection()
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TRIGGER fail_credit_insert BEFORE INSERT ON users
                     BEGIN SELECT RAISE(ABORT, 'forced failure'); END;
                     CREATE TRIGGER fail_credit_update BEFORE UPDATE ON users
                     BEGIN SELECT RAISE(ABORT, 'forced failure'); END;",
                )
            })
            .await
            .map_err(map_tr_err)
    }
}
