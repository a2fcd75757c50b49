use chrono::Utc;
use pitchbase_core::{CoreError, CoreResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::model::{Payment, PaymentMethod, PaymentState};
use crate::repository::PaymentRepository;

/// One async mutex per booking. The overpayment check reads the existing
/// attempts and then inserts; two concurrent attempts on the same booking
/// must not interleave between those two steps, or both can pass the check.
struct BookingLockMap {
    inner: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl BookingLockMap {
    fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    async fn key_lock(&self, booking_id: Uuid) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().await;
        map.entry(booking_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Payment Ledger: records payment attempts and their one-shot outcomes.
///
/// The ledger never touches bookings; the Booking Ledger passes in the
/// booking total and reconciles its own paid amount afterwards from
/// `sum_completed_for_booking`.
pub struct PaymentLedger {
    repo: Arc<dyn PaymentRepository>,
    booking_locks: BookingLockMap,
}

impl PaymentLedger {
    pub fn new(repo: Arc<dyn PaymentRepository>) -> Self {
        Self {
            repo,
            booking_locks: BookingLockMap::new(),
        }
    }

    /// Record a new attempt. Pending attempts reserve balance too, so a
    /// later completion can never push the completed sum past the total.
    /// The check-then-insert runs under the booking's lock, so concurrent
    /// attempts serialize and the loser sees the winner's reservation.
    pub async fn create_payment(
        &self,
        booking_id: Uuid,
        booking_total: i64,
        amount: i64,
        method: PaymentMethod,
    ) -> CoreResult<Payment> {
        if amount <= 0 {
            return Err(CoreError::Validation(
                "Payment amount must be a positive amount".into(),
            ));
        }

        let key = self.booking_locks.key_lock(booking_id).await;
        let _guard = key.lock().await;

        let reserved: i64 = self
            .repo
            .list_for_booking(booking_id)
            .await?
            .iter()
            .filter(|p| p.state != PaymentState::Failed)
            .map(|p| p.amount)
            .sum();

        let remaining = booking_total - reserved;
        if amount > remaining {
            warn!(
                "Rejecting payment of {} against booking {}: remaining balance {}",
                amount, booking_id, remaining
            );
            return Err(CoreError::Overpayment { amount, remaining });
        }

        let payment = Payment::new(booking_id, amount, method);
        self.repo.insert(&payment).await?;
        info!(
            "Payment {} recorded for booking {}: {} via {}",
            payment.id,
            booking_id,
            amount,
            method.as_str()
        );
        Ok(payment)
    }

    pub async fn get_payment(&self, payment_id: Uuid) -> CoreResult<Payment> {
        self.repo
            .get(payment_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Payment {}", payment_id)))
    }

    /// Set the processor-reported outcome. Terminal states are immutable: a
    /// second attempt fails with an InvalidState error and leaves the ledger
    /// unchanged.
    pub async fn mark_payment_status(
        &self,
        payment_id: Uuid,
        state: PaymentState,
    ) -> CoreResult<Payment> {
        if !state.is_terminal() {
            return Err(CoreError::Validation(
                "Payment status can only be set to COMPLETED or FAILED".into(),
            ));
        }

        let mut payment = self.get_payment(payment_id).await?;
        if payment.state.is_terminal() {
            return Err(CoreError::InvalidState {
                from: payment.state.as_str().to_string(),
                to: state.as_str().to_string(),
            });
        }

        payment.state = state;
        payment.updated_at = Utc::now();
        self.repo.update(&payment).await?;
        info!("Payment {} marked {}", payment.id, state.as_str());
        Ok(payment)
    }

    pub async fn sum_completed_for_booking(&self, booking_id: Uuid) -> CoreResult<i64> {
        Ok(self
            .repo
            .list_for_booking(booking_id)
            .await?
            .iter()
            .filter(|p| p.state == PaymentState::Completed)
            .map(|p| p.amount)
            .sum())
    }

    pub async fn list_for_booking(&self, booking_id: Uuid) -> CoreResult<Vec<Payment>> {
        self.repo.list_for_booking(booking_id).await
    }
}
