// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Tokenpay.
//!
//! Provides the error type, the receipt and configuration types shared across
//! the workspace, and the adapter traits that the storage backend and the
//! receipt-lookup client implement.

pub mod error;
pub mod fields;
pub mod traits;
pub mod types;

pub use error::TokenpayError;
pub use fields::ConfigField;
pub use types::{
    AdapterType, CreditOutcome, HealthStatus, NewReceipt, NormalizedReceipt, Provider,
    ReceiptRecord, UserVerificationConfig, VerificationOutcome, VerificationRequest,
};

pub use traits::{PluginAdapter, ProviderAdapter, StorageAdapter};
