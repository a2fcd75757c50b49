use chrono::{NaiveDate, Utc};
use pitchbase_catalog::{SlotStatus, TurfFilter, TurfRepository, TurfStatus};
use pitchbase_core::{AuthContext, BookingPolicy, CoreError, CoreResult};
use pitchbase_payment::{Payment, PaymentLedger, PaymentMethod, PaymentState};
use pitchbase_shared::events::BookingEvent;
use pitchbase_shared::pii::Masked;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use crate::model::{Booking, BookingDraft, BookingStatus, PaymentProgress, SlotRequest};
use crate::repository::{BookingFilter, BookingRepository};

/// One async mutex per (turf, date). The check-then-act in `create_booking`
/// runs entirely inside this lock, so two concurrent attempts on the same
/// calendar day serialize and the loser sees the winner's booking.
struct SlotLockMap {
    inner: Mutex<HashMap<(Uuid, NaiveDate), Arc<Mutex<()>>>>,
}

impl SlotLockMap {
    fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    async fn key_lock(&self, turf_id: Uuid, date: NaiveDate) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().await;
        map.entry((turf_id, date))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Booking Ledger: owns the booking state machine and the double-booking
/// invariant. Payments are delegated to the Payment Ledger and reconciled
/// back into the booking's paid amount.
pub struct BookingLedger {
    bookings: Arc<dyn BookingRepository>,
    catalog: Arc<dyn TurfRepository>,
    payments: Arc<PaymentLedger>,
    policy: BookingPolicy,
    events: broadcast::Sender<BookingEvent>,
    slot_locks: SlotLockMap,
}

impl BookingLedger {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        catalog: Arc<dyn TurfRepository>,
        payments: Arc<PaymentLedger>,
        policy: BookingPolicy,
        events: broadcast::Sender<BookingEvent>,
    ) -> Self {
        Self {
            bookings,
            catalog,
            payments,
            policy,
            events,
            slot_locks: SlotLockMap::new(),
        }
    }

    fn emit(&self, event: BookingEvent) {
        // No subscribers is fine; delivery is the subscribers' concern.
        let _ = self.events.send(event);
    }

    /// Create a booking in PENDING against a turf's calendar.
    ///
    /// Price resolution, the overlap check against active bookings, and the
    /// slot flip to BOOKED all happen under the (turf, date) lock.
    pub async fn create_booking(&self, ctx: &AuthContext, draft: BookingDraft) -> CoreResult<Booking> {
        draft.validate()?;

        let turf = self
            .catalog
            .get_turf(draft.turf_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Turf {}", draft.turf_id)))?;
        if turf.status != TurfStatus::Active {
            return Err(CoreError::Conflict(format!(
                "Turf {} is not open for booking ({})",
                turf.id,
                turf.status.as_str()
            )));
        }

        let key = self.slot_locks.key_lock(turf.id, draft.date).await;
        let _guard = key.lock().await;

        // Resolve the concrete slot, if one exists for the request.
        let slot = match &draft.request {
            SlotRequest::Slot(slot_id) => {
                let slot = self
                    .catalog
                    .get_slot(*slot_id)
                    .await?
                    .ok_or_else(|| CoreError::NotFound(format!("Slot {}", slot_id)))?;
                if slot.turf_id != turf.id {
                    return Err(CoreError::Validation(format!(
                        "Slot {} does not belong to turf {}",
                        slot.id, turf.id
                    )));
                }
                if slot.date != draft.date {
                    return Err(CoreError::Validation(format!(
                        "Slot {} is on {}, not {}",
                        slot.id, slot.date, draft.date
                    )));
                }
                Some(slot)
            }
            SlotRequest::Range(range) => self
                .catalog
                .list_slots(turf.id, Some(draft.date))
                .await?
                .into_iter()
                .find(|s| s.range == *range),
        };

        let range = match (&slot, &draft.request) {
            (Some(s), _) => s.range,
            (None, SlotRequest::Range(range)) => *range,
            // A slot id that resolved to nothing was already a NotFound.
            (None, SlotRequest::Slot(_)) => unreachable!(),
        };

        if range.duration_minutes() != (draft.duration_hours as i64) * 60 {
            return Err(CoreError::Validation(format!(
                "Requested duration of {}h does not match window {}",
                draft.duration_hours, range
            )));
        }

        if let Some(slot) = &slot {
            if slot.status != SlotStatus::Available {
                return Err(CoreError::SlotUnavailable(format!(
                    "Slot {} is {}",
                    slot.id,
                    slot.status.as_str()
                )));
            }
        }

        // The double-booking check: no PENDING/CONFIRMED booking on this
        // turf/date may overlap the requested window.
        let active = self
            .bookings
            .list_active_for_turf_date(turf.id, draft.date)
            .await?;
        if let Some(clash) = active.iter().find(|b| b.range.overlaps(&range)) {
            warn!(
                "Booking attempt by {} on turf {} {} {} lost to booking {}",
                ctx.user_id, turf.id, draft.date, range, clash.id
            );
            return Err(CoreError::SlotUnavailable(format!(
                "The window {} on {} is already taken",
                range, draft.date
            )));
        }

        let price_per_hour = slot
            .as_ref()
            .and_then(|s| s.price_override)
            .unwrap_or(turf.hourly_price);
        let total_amount = price_per_hour * draft.duration_hours as i64;

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            turf_id: turf.id,
            slot_id: slot.as_ref().map(|s| s.id),
            date: draft.date,
            range,
            duration_hours: draft.duration_hours,
            player_id: ctx.user_id.clone(),
            player_name: draft.player_name,
            player_email: Masked(draft.player_email),
            player_phone: Masked(draft.player_phone),
            total_amount,
            paid_amount: 0,
            status: BookingStatus::Pending,
            payment_progress: PaymentProgress::Unpaid,
            payment_method: None,
            created_at: now,
            updated_at: now,
        };

        if let Some(mut slot) = slot {
            slot.mark_booked(booking.id);
            self.catalog.update_slot(&slot).await?;
        }
        self.bookings.insert(&booking).await?;

        info!(
            "Booking {} created on turf {} {} {} for {} ({} total)",
            booking.id, turf.id, booking.date, booking.range, booking.player_id, total_amount
        );
        self.emit(BookingEvent::Created {
            booking_id: booking.id,
            turf_id: turf.id,
            player_id: booking.player_id.clone(),
            date: booking.date,
            range: booking.range,
            total_amount,
            timestamp: now.timestamp(),
        });

        Ok(booking)
    }

    pub async fn get_booking(&self, booking_id: Uuid) -> CoreResult<Booking> {
        self.bookings
            .get(booking_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Booking {}", booking_id)))
    }

    async fn get_booking_for_owner(
        &self,
        ctx: &AuthContext,
        booking_id: Uuid,
    ) -> CoreResult<Booking> {
        let booking = self.get_booking(booking_id).await?;
        let turf = self
            .catalog
            .get_turf(booking.turf_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Turf {}", booking.turf_id)))?;
        ctx.require_owner_of(&turf.owner_id, "this booking's turf")?;
        Ok(booking)
    }

    fn require_pending(booking: &Booking, to: BookingStatus) -> CoreResult<()> {
        if booking.status != BookingStatus::Pending {
            return Err(CoreError::InvalidState {
                from: booking.status.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }
        Ok(())
    }

    /// Owner accepts a pending booking.
    pub async fn accept_booking(&self, ctx: &AuthContext, booking_id: Uuid) -> CoreResult<Booking> {
        let mut booking = self.get_booking_for_owner(ctx, booking_id).await?;
        Self::require_pending(&booking, BookingStatus::Confirmed)?;

        booking.status = BookingStatus::Confirmed;
        booking.updated_at = Utc::now();
        self.bookings.update(&booking).await?;

        info!("Booking {} confirmed by {}", booking.id, ctx.user_id);
        self.emit(BookingEvent::Accepted {
            booking_id: booking.id,
            turf_id: booking.turf_id,
            player_id: booking.player_id.clone(),
            timestamp: booking.updated_at.timestamp(),
        });
        Ok(booking)
    }

    /// Owner rejects a pending booking; the slot goes back to AVAILABLE.
    pub async fn reject_booking(
        &self,
        ctx: &AuthContext,
        booking_id: Uuid,
        reason: Option<String>,
    ) -> CoreResult<Booking> {
        let mut booking = self.get_booking_for_owner(ctx, booking_id).await?;
        Self::require_pending(&booking, BookingStatus::Cancelled)?;

        booking.status = BookingStatus::Cancelled;
        booking.updated_at = Utc::now();
        self.bookings.update(&booking).await?;
        self.release_slot(&booking).await?;

        info!(
            "Booking {} rejected by {} ({})",
            booking.id,
            ctx.user_id,
            reason.as_deref().unwrap_or("no reason given")
        );
        self.emit(BookingEvent::Rejected {
            booking_id: booking.id,
            turf_id: booking.turf_id,
            player_id: booking.player_id.clone(),
            reason,
            timestamp: booking.updated_at.timestamp(),
        });
        Ok(booking)
    }

    /// Player or owner cancels a pending booking. A confirmed booking cannot
    /// be cancelled here: that path belongs to the external refund policy.
    pub async fn cancel_booking(&self, ctx: &AuthContext, booking_id: Uuid) -> CoreResult<Booking> {
        let mut booking = self.get_booking(booking_id).await?;

        let turf = self
            .catalog
            .get_turf(booking.turf_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Turf {}", booking.turf_id)))?;
        let is_player = ctx.user_id == booking.player_id;
        if !is_player && !ctx.owns(&turf.owner_id) {
            return Err(CoreError::Forbidden(
                "Only the booking player or the turf owner may cancel".into(),
            ));
        }

        Self::require_pending(&booking, BookingStatus::Cancelled)?;

        booking.status = BookingStatus::Cancelled;
        booking.updated_at = Utc::now();
        self.bookings.update(&booking).await?;
        self.release_slot(&booking).await?;

        info!("Booking {} cancelled by {}", booking.id, ctx.user_id);
        self.emit(BookingEvent::Rejected {
            booking_id: booking.id,
            turf_id: booking.turf_id,
            player_id: booking.player_id.clone(),
            reason: Some("cancelled".into()),
            timestamp: booking.updated_at.timestamp(),
        });
        Ok(booking)
    }

    async fn release_slot(&self, booking: &Booking) -> CoreResult<()> {
        if let Some(slot_id) = booking.slot_id {
            if let Some(mut slot) = self.catalog.get_slot(slot_id).await? {
                if slot.booked_by == Some(booking.id) {
                    slot.release();
                    self.catalog.update_slot(&slot).await?;
                }
            }
        }
        Ok(())
    }

    /// Record a payment made directly (cash at the venue, or an already
    /// settled transfer): creates the ledger entry, completes it, and
    /// reconciles the booking in one step.
    pub async fn record_payment(
        &self,
        booking_id: Uuid,
        amount: i64,
        method: PaymentMethod,
    ) -> CoreResult<Booking> {
        let booking = self.get_booking(booking_id).await?;
        if booking.status == BookingStatus::Cancelled {
            return Err(CoreError::InvalidState {
                from: booking.status.as_str().to_string(),
                to: "PAYMENT".to_string(),
            });
        }

        let payment = self
            .payments
            .create_payment(booking.id, booking.total_amount, amount, method)
            .await?;
        let payment = self
            .payments
            .mark_payment_status(payment.id, PaymentState::Completed)
            .await?;

        self.reconcile_payment(&payment).await
    }

    /// Open a pending payment attempt against a booking; the processor's
    /// webhook settles it later.
    pub async fn open_payment(
        &self,
        booking_id: Uuid,
        amount: i64,
        method: PaymentMethod,
    ) -> CoreResult<Payment> {
        let booking = self.get_booking(booking_id).await?;
        if booking.status == BookingStatus::Cancelled {
            return Err(CoreError::InvalidState {
                from: booking.status.as_str().to_string(),
                to: "PAYMENT".to_string(),
            });
        }
        self.payments
            .create_payment(booking.id, booking.total_amount, amount, method)
            .await
    }

    /// Fold a completed payment back into its booking: recompute the paid
    /// amount and derived progress, and auto-confirm a fully paid PENDING
    /// booking when the platform policy allows it.
    pub async fn reconcile_payment(&self, payment: &Payment) -> CoreResult<Booking> {
        let mut booking = self.get_booking(payment.booking_id).await?;

        let paid = self.payments.sum_completed_for_booking(booking.id).await?;
        booking.apply_paid_amount(paid);
        booking.payment_method = Some(payment.method);

        if booking.payment_progress == PaymentProgress::Paid
            && booking.status == BookingStatus::Pending
            && self.policy.auto_confirm_on_full_payment
        {
            booking.status = BookingStatus::Confirmed;
            info!("Booking {} auto-confirmed on full payment", booking.id);
        }

        self.bookings.update(&booking).await?;
        self.emit(BookingEvent::PaymentRecorded {
            booking_id: booking.id,
            payment_id: payment.id,
            amount: payment.amount,
            paid_amount: booking.paid_amount,
            total_amount: booking.total_amount,
            timestamp: Utc::now().timestamp(),
        });
        Ok(booking)
    }

    pub async fn list_for_owner(
        &self,
        ctx: &AuthContext,
        owner_id: &str,
        filter: &BookingFilter,
    ) -> CoreResult<Vec<Booking>> {
        ctx.require_owner_of(owner_id, "these bookings")?;

        let turfs = self
            .catalog
            .list_turfs(&TurfFilter {
                owner_id: Some(owner_id.to_string()),
                ..Default::default()
            })
            .await?;
        let turf_ids: Vec<Uuid> = turfs.iter().map(|t| t.id).collect();
        self.bookings.list_for_turfs(&turf_ids, filter).await
    }

    pub async fn list_for_player(&self, player_id: &str) -> CoreResult<Vec<Booking>> {
        self.bookings.list_for_player(player_id).await
    }
}
