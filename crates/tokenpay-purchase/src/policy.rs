// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-provider acceptance rules for a verified receipt.
//!
//! Rules run in order and the first failure wins: amount, receiver name,
//! receiver account. Bank receipts are scoped by the account suffix used in
//! the lookup, so their name and account checks never reject.

use thiserror::Error;
use tokenpay_core::{NormalizedReceipt, Provider};
use tracing::{debug, info};

use crate::matcher::{account_matches, names_match};
use crate::packages::Package;
use crate::resolve::ResolvedConfig;

/// Why a receipt was not accepted. The display text is shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyRejection {
    #[error("Amount mismatch: expected {expected} ETB, got {actual} ETB")]
    AmountMismatch { expected: u32, actual: f64 },

    #[error("Payment received by unexpected account")]
    UnexpectedReceiver,

    #[error("Payment to unexpected Telebirr number")]
    UnexpectedTelebirrNumber,
}

/// Outcome of [`decide`].
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Decision {
    Accept,
    Reject(PolicyRejection),
}

/// Decides whether `receipt` pays for `package` to the configured account.
pub fn decide(package: &Package, receipt: &NormalizedReceipt, config: &ResolvedConfig) -> Decision {
    match check(package, receipt, config) {
        Ok(()) => Decision::Accept,
        Err(rejection) => Decision::Reject(rejection),
    }
}

fn check(
    package: &Package,
    receipt: &NormalizedReceipt,
    config: &ResolvedConfig,
) -> Result<(), PolicyRejection> {
    if receipt.amount != f64::from(package.price_etb) {
        return Err(PolicyRejection::AmountMismatch {
            expected: package.price_etb,
            actual: receipt.amount,
        });
    }

    let receiver_name = receipt.receiver_name.as_deref().unwrap_or_default();
    match (receipt.provider, config.expected_owner()) {
        (Provider::Telebirr, Some(owner)) => {
            if !names_match(receiver_name, owner) {
                return Err(PolicyRejection::UnexpectedReceiver);
            }
        }
        (Provider::Telebirr, None) => {
            info!("no platform owner configured, receiver name check skipped");
        }
        (provider, _) => {
            debug!(%provider, "name check skipped for bank; suffix and amount used");
        }
    }

    let receiver_account = receipt
        .receiver_account
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty());
    match (receipt.provider, receiver_account, config.account_for(receipt.provider)) {
        (Provider::Telebirr, Some(received), Some(expected)) => {
            if !account_matches(received, expected) {
                return Err(PolicyRejection::UnexpectedTelebirrNumber);
            }
        }
        (Provider::Telebirr, _, _) => {}
        (provider, Some(received), Some(expected)) => {
            info!(
                %provider,
                receiver_account = received,
                matches = account_matches(received, expected),
                "bank receiver account compared for information only"
            );
        }
        (_, _, _) => {}
    }

    Ok(())
}
