// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token balance reads.

use rusqlite::{OptionalExtension, params};
use tokenpay_core::TokenpayError;

use crate::database::Database;

/// Current balance for `user_id`; 0 when the user has no row.
pub async fn token_balance(db: &Database, user_id: &str) -> Result<i64, TokenpayError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let tokens: Option<i64> = conn
                .query_row(
                    "SELECT tokens FROM users WHERE id = ?1",
                    params![user_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(tokens.unwrap_or(0))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Increment a user's balance inside an open transaction, creating the row
/// if needed. Returns the new balance.
pub(crate) fn credit_tokens(
    tx: &rusqlite::Transaction<'_>,
    user_id: &str,
    tokens: i64,
) -> Result<i64, rusqlite::Error> {
    tx.query_row(
        "INSERT INTO users (id, tokens) VALUES (?1, ?2)
         ON CONFLICT (id) DO UPDATE SET
             tokens = users.tokens + excluded.tokens,
             updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
         RETURNING tokens",
        params![user_id, tokens],
        |row| row.get(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_user_has_zero_balance() {
        let db = Database::open_in_memory().await.unwrap();
        assert_eq!(token_balance(&db, "nobody").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn credit_creates_then_increments() {
        let db = Database::open_in_memory().await.unwrap();
        let balances = db
            .connection()
            .call(|conn| -> Result<(i64, i64), rusqlite::Error> {
                let tx = conn.transaction()?;
                let first = credit_tokens(&tx, "user-1", 50)?;
                let second = credit_tokens(&tx, "user-1", 200)?;
                tx.commit()?;
                Ok((first, second))
            })
            .await
            .unwrap();
        assert_eq!(balances, (50, 250));
        assert_eq!(token_balance(&db, "user-1").await.unwrap(), 250);
    }
}
