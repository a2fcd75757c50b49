use async_trait::async_trait;
use uuid::Uuid;

use crate::CoreResult;

/// Contract with the external payment processor.
///
/// Submitting hands a payment attempt to the provider and returns its
/// reference; the provider reports the outcome later through the
/// payment-status webhook, which is the only place status is set.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn submit(&self, payment_id: Uuid, amount: i64, method: &str) -> CoreResult<String>;
}

/// Stand-in processor for development and tests: accepts everything and
/// returns a synthetic provider reference.
pub struct MockProcessor;

#[async_trait]
impl PaymentProcessor for MockProcessor {
    async fn submit(&self, payment_id: Uuid, amount: i64, method: &str) -> CoreResult<String> {
        tracing::info!(
            "Submitting payment {} ({} minor units, {}) to mock processor",
            payment_id,
            amount,
            method
        );
        Ok(format!("pp_{}", payment_id.simple()))
    }
}
