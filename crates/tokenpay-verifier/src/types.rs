// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the receipt-lookup API.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Request body for `POST /verify-telebirr`.
#[derive(Debug, Clone, Serialize)]
pub struct TelebirrLookup<'a> {
    pub reference: &'a str,
}

/// Request body for `POST /verify-cbe`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CbeLookup<'a> {
    pub reference: &'a str,
    pub account_suffix: &'a str,
}

/// Request body for `POST /verify-abyssinia`.
#[derive(Debug, Clone, Serialize)]
pub struct AbyssiniaLookup<'a> {
    pub reference: &'a str,
    pub suffix: &'a str,
}

/// Response envelope: `{ok: true, data}` or `{ok: false, error}`.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupEnvelope {
    pub ok: bool,
    #[serde(default)]
    pub data: Option<WireReceipt>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Receipt as the lookup API returns it. Every field is optional on the
/// wire; which ones are kept depends on the provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireReceipt {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub payer_name: Option<String>,
    #[serde(default)]
    pub payer_phone: Option<String>,
    #[serde(default)]
    pub payer_account: Option<String>,
    #[serde(default)]
    pub receiver_name: Option<String>,
    #[serde(default)]
    pub receiver_account: Option<String>,
    #[serde(default)]
    pub txn_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_text: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub total_amount: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub service_fee: Option<f64>,
    #[serde(default, rename = "serviceFeeVAT", deserialize_with = "number_or_string")]
    pub service_fee_vat: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Currency code providers append to (or put before) textual amounts.
const CURRENCY_CODE: &str = "ETB";

/// Accepts `50`, `50.0`, `"50.00"`, `"1,250.00 ETB"`, `""` and `null`.
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            let cleaned: String = strip_currency(trimmed)
                .chars()
                .filter(|c| *c != ',')
                .collect();
            cleaned
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid amount `{s}`")))
        }
    }
}

fn strip_currency(amount: &str) -> &str {
    let upper = amount.to_ascii_uppercase();
    if upper.ends_with(CURRENCY_CODE) {
        amount[..amount.len() - CURRENCY_CODE.len()].trim_end()
    } else if upper.starts_with(CURRENCY_CODE) {
        amount[CURRENCY_CODE.len()..].trim_start()
    } else {
        amount
    }
}
