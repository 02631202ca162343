// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Tokenpay infrastructure.

use thiserror::Error;

/// The error type used across adapter traits and infrastructure code.
///
/// These are failures the caller cannot fix by changing its input: storage
/// faults, transport failures to the receipt-lookup API, timeouts.
/// Client-facing rejections live in `tokenpay-purchase`.
#[derive(Debug, Error)]
pub enum TokenpayError {
    /// Configuration errors (invalid TOML, bad header values, missing keys).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Receipt-lookup API errors that are not an ordinary "not verified" answer.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TokenpayError {
    /// Wrap any error as a storage error.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }
}
