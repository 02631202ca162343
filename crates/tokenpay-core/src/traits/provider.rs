// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for receipt-lookup backends.

use async_trait::async_trait;

use crate::error::TokenpayError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{VerificationOutcome, VerificationRequest};

/// Adapter for the payment providers' receipt-lookup APIs.
///
/// An upstream "not found" or "invalid reference" answer is an
/// `Ok(VerificationOutcome::Failed)`. `Err` is reserved for failures the
/// caller could not have caused: transport errors, timeouts, malformed
/// upstream payloads.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Looks up one receipt and normalizes it.
    async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationOutcome, TokenpayError>;
}
