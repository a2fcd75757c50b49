use crate::TimeRange;
use chrono::NaiveDate;
use uuid::Uuid;

/// Booking lifecycle events, published on an in-process broadcast channel.
///
/// Downstream subsystems (notifications, chat, analytics) subscribe to these;
/// delivery beyond the process boundary is their concern, not the ledger's.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingEvent {
    Created {
        booking_id: Uuid,
        turf_id: Uuid,
        player_id: String,
        date: NaiveDate,
        range: TimeRange,
        total_amount: i64,
        timestamp: i64,
    },
    Accepted {
        booking_id: Uuid,
        turf_id: Uuid,
        player_id: String,
        timestamp: i64,
    },
    Rejected {
        booking_id: Uuid,
        turf_id: Uuid,
        player_id: String,
        reason: Option<String>,
        timestamp: i64,
    },
    PaymentRecorded {
        booking_id: Uuid,
        payment_id: Uuid,
        amount: i64,
        paid_amount: i64,
        total_amount: i64,
        timestamp: i64,
    },
}

impl BookingEvent {
    pub fn booking_id(&self) -> Uuid {
        match self {
            BookingEvent::Created { booking_id, .. }
            | BookingEvent::Accepted { booking_id, .. }
            | BookingEvent::Rejected { booking_id, .. }
            | BookingEvent::PaymentRecorded { booking_id, .. } => *booking_id,
        }
    }
}
