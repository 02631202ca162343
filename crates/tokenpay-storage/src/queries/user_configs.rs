// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user verification settings.

use rusqlite::{OptionalExtension, Row, params};
use tokenpay_core::{TokenpayError, UserVerificationConfig};

use crate::database::Database;

const COLUMNS: &str = "platform_owner_full_name, cbe_account_suffix, abyssinia_account_suffix,
                       telebirr_number, cbe_account_number, abyssinia_account_number";

fn row_to_config(row: &Row<'_>) -> Result<UserVerificationConfig, rusqlite::Error> {
    Ok(UserVerificationConfig {
        platform_owner_full_name: row.get(0)?,
        cbe_account_suffix: row.get(1)?,
        abyssinia_account_suffix: row.get(2)?,
        telebirr_number: row.get(3)?,
        cbe_account_number: row.get(4)?,
        abyssinia_account_number: row.get(5)?,
    })
}

/// Stored settings for `user_id`, if the user ever saved any.
pub async fn get_user_config(
    db: &Database,
    user_id: &str,
) -> Result<Option<UserVerificationConfig>, TokenpayError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let sql = format!("SELECT {COLUMNS} FROM user_configs WHERE user_id = ?1");
            conn.query_row(&sql, params![user_id], row_to_config)
                .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert or partially update a user's settings.
///
/// A `None` field keeps whatever is stored; callers normalize blank strings
/// to `None` beforehand.
pub async fn upsert_user_config(
    db: &Database,
    user_id: &str,
    config: &UserVerificationConfig,
) -> Result<UserVerificationConfig, TokenpayError> {
    let user_id = user_id.to_string();
    let config = config.clone();
    db.connection()
        .call(move |conn| {
            let sql = format!(
                "INSERT INTO user_configs (user_id, {COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT (user_id) DO UPDATE SET
                     platform_owner_full_name = COALESCE(excluded.platform_owner_full_name, user_configs.platform_owner_full_name),
                     cbe_account_suffix = COALESCE(excluded.cbe_account_suffix, user_configs.cbe_account_suffix),
                     abyssinia_account_suffix = COALESCE(excluded.abyssinia_account_suffix, user_configs.abyssinia_account_suffix),
                     telebirr_number = COALESCE(excluded.telebirr_number, user_configs.telebirr_number),
                     cbe_account_number = COALESCE(excluded.cbe_account_number, user_configs.cbe_account_number),
                     abyssinia_account_number = COALESCE(excluded.abyssinia_account_number, user_configs.abyssinia_account_number),
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 RETURNING {COLUMNS}"
            );
            conn.query_row(
                &sql,
                params![
                    user_id,
                    config.platform_owner_full_name,
                    config.cbe_account_suffix,
                    config.abyssinia_account_suffix,
                    config.telebirr_number,
                    config.cbe_account_number,
                    config.abyssinia_account_number,
                ],
                row_to_config,
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}
