// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-facing errors of the purchase flow.

use strum::Display;
use thiserror::Error;
use tokenpay_core::TokenpayError;

use crate::policy::PolicyRejection;

/// Message returned when the same `(provider, reference)` was already used.
pub const DUPLICATE_REFERENCE: &str = "This reference number has already been used.";

/// Message shown in place of any internal failure.
pub const INTERNAL_MESSAGE: &str = "internal error";

/// The three outcomes a caller can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    BadRequest,
    Conflict,
    Internal,
}

/// Why a purchase, check or config update did not go through.
#[derive(Debug, Error)]
pub enum PurchaseError {
    /// The input or the receipt is not acceptable. The message is user-safe.
    #[error("{0}")]
    BadRequest(String),

    /// The reference was already used.
    #[error("{0}")]
    Conflict(String),

    /// Storage, transport or any other failure the caller did not cause.
    #[error(transparent)]
    Internal(#[from] TokenpayError),
}

impl PurchaseError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn duplicate() -> Self {
        Self::Conflict(DUPLICATE_REFERENCE.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The message safe to return to a client. Internal details stay in logs.
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => INTERNAL_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<PolicyRejection> for PurchaseError {
    fn from(rejection: PolicyRejection) -> Self {
        Self::BadRequest(rejection.to_string())
    }
}
