// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted provider adapter for deterministic tests.
//!
//! `FakeProvider` implements `ProviderAdapter` by popping pre-loaded answers,
//! so tests can drive every branch of the purchase flow without the lookup API.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tokenpay_core::{
    AdapterType, HealthStatus, NormalizedReceipt, PluginAdapter, Provider, ProviderAdapter,
    TokenpayError, VerificationOutcome, VerificationRequest,
};

/// One scripted answer. `Err` becomes a `TokenpayError::Provider`.
type Scripted = Result<VerificationOutcome, String>;

/// A provider adapter that answers from a FIFO queue.
///
/// When the queue is empty the fallback answer is used; without a fallback
/// the lookup fails with "Receipt not found".
pub struct FakeProvider {
    script: Mutex<VecDeque<Scripted>>,
    fallback: Option<VerificationOutcome>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<VerificationRequest>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: None,
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with `receipt` once the script runs out.
    pub fn always(receipt: NormalizedReceipt) -> Self {
        Self {
            fallback: Some(VerificationOutcome::Verified(receipt)),
            ..Self::new()
        }
    }

    /// Sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn push_verified(&self, receipt: NormalizedReceipt) {
        self.script
            .lock()
            .await
            .push_back(Ok(VerificationOutcome::Verified(receipt)));
    }

    pub async fn push_failed(&self, reason: impl Into<String>) {
        self.script.lock().await.push_back(Ok(VerificationOutcome::Failed {
            reason: reason.into(),
        }));
    }

    pub async fn push_error(&self, message: impl Into<String>) {
        self.script.lock().await.push_back(Err(message.into()));
    }

    /// Number of lookups performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in order.
    pub async fn requests(&self) -> Vec<VerificationRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for FakeProvider {
    fn name(&self) -> &str {
        "fake-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, TokenpayError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TokenpayError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for FakeProvider {
    async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationOutcome, TokenpayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.script.lock().await.pop_front();
        match next {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(message)) => Err(TokenpayError::Provider {
                message,
                source: None,
            }),
            None => Ok(self.fallback.clone().unwrap_or(VerificationOutcome::Failed {
                reason: "Receipt not found".to_string(),
            })),
        }
    }
}

/// A verified receipt fixture paid to "Abebe Kebede".
pub fn receipt(provider: Provider, reference: &str, amount: f64) -> NormalizedReceipt {
    let mut receipt = NormalizedReceipt::new(provider, reference, amount, "2026-03-01T10:00:00Z");
    receipt.payer_name = Some("Sara Tesfaye".to_string());
    receipt.receiver_name = Some("Abebe Kebede".to_string());
    if provider == Provider::Telebirr {
        receipt.status = Some("Completed".to_string());
    }
    receipt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telebirr(reference: &str) -> VerificationRequest {
        VerificationRequest::Telebirr {
            reference: reference.to_string(),
        }
    }

    #[tokio::test]
    async fn script_is_consumed_in_order() {
        let provider = FakeProvider::new();
        provider.push_failed("first").await;
        provider.push_error("boom").await;

        assert_eq!(
            provider.verify(&telebirr("REF01")).await.unwrap(),
            VerificationOutcome::Failed {
                reason: "first".into()
            }
        );
        assert!(provider.verify(&telebirr("REF02")).await.is_err());
        assert!(matches!(
            provider.verify(&telebirr("REF03")).await.unwrap(),
            VerificationOutcome::Failed { .. }
        ));
        assert_eq!(provider.calls(), 3);
        assert_eq!(provider.requests().await[1], telebirr("REF02"));
    }

    #[tokio::test]
    async fn fallback_answers_forever() {
        let provider = FakeProvider::always(receipt(Provider::Cbe, "FT123456", 50.0));
        for _ in 0..3 {
            assert!(matches!(
                provider.verify(&telebirr("REF01")).await.unwrap(),
                VerificationOutcome::Verified(_)
            ));
        }
    }
}
