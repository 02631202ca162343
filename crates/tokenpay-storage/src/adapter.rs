// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use tokenpay_config::model::StorageConfig;
use tokenpay_core::{
    AdapterType, CreditOutcome, HealthStatus, NewReceipt, PluginAdapter, Provider, ReceiptRecord,
    StorageAdapter, TokenpayError, UserVerificationConfig,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// The database is opened on the first call to [`StorageAdapter::initialize`];
/// every other operation fails until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    pub fn db(&self) -> Result<&Database, TokenpayError> {
        self.db
            .get()
            .ok_or_else(|| TokenpayError::storage("storage not initialized, call initialize() first"))
    }

    async fn checkpoint(&self, db: &Database) -> Result<(), TokenpayError> {
        if !self.config.wal_mode {
            return Ok(());
        }
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TokenpayError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("not initialized".to_string()));
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TokenpayError> {
        match self.db.get() {
            Some(db) => self.checkpoint(db).await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), TokenpayError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| TokenpayError::storage("storage already initialized"))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), TokenpayError> {
        self.checkpoint(self.db()?).await
    }

    async fn find_receipt(
        &self,
        provider: Provider,
        reference: &str,
    ) -> Result<Option<ReceiptRecord>, TokenpayError> {
        queries::receipts::find_receipt(self.db()?, provider, reference).await
    }

    async fn get_user_config(
        &self,
        user_id: &str,
    ) -> Result<Option<UserVerificationConfig>, TokenpayError> {
        queries::user_configs::get_user_config(self.db()?, user_id).await
    }

    async fn upsert_user_config(
        &self,
        user_id: &str,
        config: &UserVerificationConfig,
    ) -> Result<UserVerificationConfig, TokenpayError> {
        queries::user_configs::upsert_user_config(self.db()?, user_id, config).await
    }

    async fn token_balance(&self, user_id: &str) -> Result<i64, TokenpayError> {
        queries::users::token_balance(self.db()?, user_id).await
    }

    async fn record_and_credit(&self, receipt: &NewReceipt) -> Result<CreditOutcome, TokenpayError> {
        queries::receipts::record_and_credit(self.db()?, receipt).await
    }
}
