use async_trait::async_trait;
use pitchbase_core::CoreResult;
use uuid::Uuid;

use crate::model::Payment;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn insert(&self, payment: &Payment) -> CoreResult<()>;

    async fn get(&self, id: Uuid) -> CoreResult<Option<Payment>>;

    async fn update(&self, payment: &Payment) -> CoreResult<()>;

    async fn list_for_booking(&self, booking_id: Uuid) -> CoreResult<Vec<Payment>>;
}
