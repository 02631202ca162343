// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Receipt ledger operations, including the atomic record-and-credit.

use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row, TransactionBehavior, params};
use tokenpay_core::{CreditOutcome, NewReceipt, Provider, ReceiptRecord, TokenpayError};
use tracing::{debug, warn};

use crate::database::Database;
use crate::queries::users::credit_tokens;

fn row_to_receipt(row: &Row<'_>) -> Result<ReceiptRecord, rusqlite::Error> {
    let provider: String = row.get(1)?;
    let provider = provider
        .parse::<Provider>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    Ok(ReceiptRecord {
        id: row.get(0)?,
        provider,
        reference: row.get(2)?,
        amount: row.get(3)?,
        receiver_name: row.get(4)?,
        payer_name: row.get(5)?,
        status: row.get(6)?,
        raw_data: row.get(7)?,
        user_id: row.get(8)?,
        package_id: row.get(9)?,
        credited_tokens: row.get(10)?,
        created_at: row.get(11)?,
    })
}

/// Whether an insert failed on the `(provider, reference)` unique key.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Point lookup by the unique key.
pub async fn find_receipt(
    db: &Database,
    provider: Provider,
    reference: &str,
) -> Result<Option<ReceiptRecord>, TokenpayError> {
    let reference = reference.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, provider, reference, amount, receiver_name, payer_name, status,
                        raw_data, user_id, package_id, credited_tokens, created_at
                 FROM receipts
                 WHERE provider = ?1 AND reference = ?2",
                params![provider.as_str(), reference],
                row_to_receipt,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert the receipt and credit its tokens to the owner, atomically.
///
/// A collision on `(provider, reference)` rolls back and yields
/// [`CreditOutcome::DuplicateReference`]; any other failure rolls back and is
/// returned as a storage error.
pub async fn record_and_credit(
    db: &Database,
    receipt: &NewReceipt,
) -> Result<CreditOutcome, TokenpayError> {
    let receipt = receipt.clone();
    let id = uuid::Uuid::new_v4().to_string();
    let outcome = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let inserted = tx.execute(
                "INSERT INTO receipts (id, provider, reference, amount, receiver_name, payer_name,
                                       status, raw_data, user_id, package_id, credited_tokens)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    id,
                    receipt.provider.as_str(),
                    receipt.reference,
                    receipt.amount,
                    receipt.receiver_name,
                    receipt.payer_name,
                    receipt.status,
                    receipt.raw_data,
                    receipt.user_id,
                    receipt.package_id,
                    receipt.credited_tokens,
                ],
            );
            match inserted {
                Ok(_) => {}
                // Dropping `tx` rolls back.
                Err(e) if is_unique_violation(&e) => return Ok(CreditOutcome::DuplicateReference),
                Err(e) => return Err(e),
            }

            let balance = credit_tokens(&tx, &receipt.user_id, receipt.credited_tokens)?;
            tx.commit()?;
            Ok(CreditOutcome::Credited { balance })
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    match outcome {
        CreditOutcome::Credited { balance } => debug!(balance, "receipt recorded"),
        CreditOutcome::DuplicateReference => warn!("receipt already recorded"),
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::users::token_balance;

    fn receipt(provider: Provider, reference: &str, user: &str, tokens: i64) -> NewReceipt {
        NewReceipt {
            provider,
            reference: reference.to_string(),
            amount: tokens as f64,
            receiver_name: "Abebe Kebede".to_string(),
            payer_name: "Sara Tesfaye".to_string(),
            status: Some("Completed".to_string()),
            raw_data: "{}".to_string(),
            user_id: user.to_string(),
            package_id: 1,
            credited_tokens: tokens,
        }
    }

    async fn receipt_count(db: &Database) -> i64 {
        db.connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT COUNT(*) FROM receipts", [], |r| r.get(0))
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn credit_records_receipt_and_balance() {
        let db = Database::open_in_memory().await.unwrap();
        let outcome = record_and_credit(&db, &receipt(Provider::Telebirr, "CE1234ABCD", "u1", 50))
            .await
            .unwrap();
        assert_eq!(outcome, CreditOutcome::Credited { balance: 50 });

        let stored = find_receipt(&db, Provider::Telebirr, "CE1234ABCD")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.user_id, "u1");
        assert_eq!(stored.credited_tokens, 50);
        assert_eq!(stored.status.as_deref(), Some("Completed"));
        assert!(!stored.created_at.is_empty());
    }

    #[tokio::test]
    async fn duplicate_reference_writes_nothing() {
        let db = Database::open_in_memory().await.unwrap();
        record_and_credit(&db, &receipt(Provider::Cbe, "FT24330ABCDE", "u1", 200))
            .await
            .unwrap();

        let again = record_and_credit(&db, &receipt(Provider::Cbe, "FT24330ABCDE", "u2", 200))
            .await
            .unwrap();
        assert_eq!(again, CreditOutcome::DuplicateReference);
        assert_eq!(receipt_count(&db).await, 1);
        assert_eq!(token_balance(&db, "u2").await.unwrap(), 0);
        assert_eq!(token_balance(&db, "u1").await.unwrap(), 200);
    }

    #[tokio::test]
    async fn same_reference_on_another_provider_is_distinct() {
        let db = Database::open_in_memory().await.unwrap();
        record_and_credit(&db, &receipt(Provider::Cbe, "FT24330ABCDE", "u1", 50))
            .await
            .unwrap();
        let other = record_and_credit(&db, &receipt(Provider::Abyssinia, "FT24330ABCDE", "u1", 50))
            .await
            .unwrap();
        assert_eq!(other, CreditOutcome::Credited { balance: 100 });
    }

    #[tokio::test]
    async fn failure_after_insert_rolls_back_receipt() {
        let db = Database::open_in_memory().await.unwrap();
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch(
                    "CREATE TRIGGER fail_credit_insert BEFORE INSERT ON users
                     BEGIN SELECT RAISE(ABORT, 'forced failure'); END;
                     CREATE TRIGGER fail_credit_update BEFORE UPDATE ON users
                     BEGIN SELECT RAISE(ABORT, 'forced failure'); END;",
                )
            })
            .await
            .unwrap();

        let result = record_and_credit(&db, &receipt(Provider::Telebirr, "CE1234ABCD", "u1", 50)).await;
        assert!(matches!(result, Err(TokenpayError::Storage { .. })));
        assert_eq!(receipt_count(&db).await, 0);
        assert_eq!(token_balance(&db, "u1").await.unwrap(), 0);
        assert!(
            find_receipt(&db, Provider::Telebirr, "CE1234ABCD")
                .await
                .unwrap()
                .is_none()
        );
    }
}
