use chrono::{DateTime, NaiveDate, Utc};
use pitchbase_core::{CoreError, CoreResult};
use pitchbase_payment::PaymentMethod;
use pitchbase_shared::pii::Masked;
use pitchbase_shared::TimeRange;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_DURATION_HOURS: u32 = 1;
pub const MAX_DURATION_HOURS: u32 = 4;

/// Booking lifecycle. CONFIRMED and CANCELLED are terminal: a reopened
/// booking is a new booking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(BookingStatus::Pending),
            "CONFIRMED" => Some(BookingStatus::Confirmed),
            "CANCELLED" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Bookings in these states hold their turf/date/range against overlap.
    pub fn holds_slot(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// Derived payment view, a pure function of paid/total. Never stored
/// independently of the amounts it is derived from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentProgress {
    Unpaid,
    Partial,
    Paid,
}

impl PaymentProgress {
    pub fn derive(paid: i64, total: i64) -> Self {
        if paid == 0 {
            PaymentProgress::Unpaid
        } else if paid >= total {
            PaymentProgress::Paid
        } else {
            PaymentProgress::Partial
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentProgress::Unpaid => "UNPAID",
            PaymentProgress::Partial => "PARTIAL",
            PaymentProgress::Paid => "PAID",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "UNPAID" => Some(PaymentProgress::Unpaid),
            "PARTIAL" => Some(PaymentProgress::Partial),
            "PAID" => Some(PaymentProgress::Paid),
            _ => None,
        }
    }
}

/// A player's reservation of a turf for a date and time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub turf_id: Uuid,
    /// Set when the booking was made against an owner-defined slot.
    pub slot_id: Option<Uuid>,
    pub date: NaiveDate,
    pub range: TimeRange,
    pub duration_hours: u32,
    pub player_id: String,
    pub player_name: String,
    pub player_email: Masked<String>,
    pub player_phone: Masked<String>,
    /// Smallest currency unit; fixed at creation from the price in force.
    pub total_amount: i64,
    pub paid_amount: i64,
    pub status: BookingStatus,
    pub payment_progress: PaymentProgress,
    pub payment_method: Option<PaymentMethod>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Reconcile the paid amount from the payment ledger's completed sum.
    pub fn apply_paid_amount(&mut self, paid: i64) {
        self.paid_amount = paid;
        self.payment_progress = PaymentProgress::derive(paid, self.total_amount);
        self.updated_at = Utc::now();
    }
}

/// Either a concrete slot or a free-form window on the turf's calendar.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRequest {
    Slot(Uuid),
    Range(TimeRange),
}

/// Input for booking creation. The player id comes from the auth context,
/// never the body.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingDraft {
    pub turf_id: Uuid,
    pub date: NaiveDate,
    pub request: SlotRequest,
    pub duration_hours: u32,
    pub player_name: String,
    pub player_email: String,
    pub player_phone: String,
}

impl BookingDraft {
    pub fn validate(&self) -> CoreResult<()> {
        if !(MIN_DURATION_HOURS..=MAX_DURATION_HOURS).contains(&self.duration_hours) {
            return Err(CoreError::Validation(format!(
                "Duration must be between {} and {} hours",
                MIN_DURATION_HOURS, MAX_DURATION_HOURS
            )));
        }
        if self.player_name.trim().is_empty() {
            return Err(CoreError::Validation("Player name is required".into()));
        }
        if !self.player_email.contains('@') {
            return Err(CoreError::Validation(format!(
                "Invalid player email: {}",
                self.player_email
            )));
        }
        if self.player_phone.trim().is_empty() {
            return Err(CoreError::Validation("Player phone is required".into()));
        }
        Ok(())
    }
}
