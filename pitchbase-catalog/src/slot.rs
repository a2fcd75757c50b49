use chrono::{DateTime, NaiveDate, Utc};
use pitchbase_core::{CoreError, CoreResult};
use pitchbase_shared::TimeRange;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Available,
    Booked,
    Maintenance,
    Blocked,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Available => "AVAILABLE",
            SlotStatus::Booked => "BOOKED",
            SlotStatus::Maintenance => "MAINTENANCE",
            SlotStatus::Blocked => "BLOCKED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "AVAILABLE" => Some(SlotStatus::Available),
            "BOOKED" => Some(SlotStatus::Booked),
            "MAINTENANCE" => Some(SlotStatus::Maintenance),
            "BLOCKED" => Some(SlotStatus::Blocked),
            _ => None,
        }
    }

    /// Whether the slot participates in the no-overlap invariant.
    pub fn occupies_calendar(&self) -> bool {
        matches!(self, SlotStatus::Available | SlotStatus::Booked)
    }
}

/// An owner-defined bookable window on a turf. Flips to `Booked` only as a
/// side effect of a booking entering the ledger, and back to `Available`
/// when that booking is rejected or cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    pub turf_id: Uuid,
    pub date: NaiveDate,
    pub range: TimeRange,
    /// Overrides the turf's hourly price when set, smallest currency unit.
    pub price_override: Option<i64>,
    pub status: SlotStatus,
    /// Booking currently holding the slot, if any.
    pub booked_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(
        turf_id: Uuid,
        date: NaiveDate,
        range: TimeRange,
        price_override: Option<i64>,
    ) -> CoreResult<Self> {
        if let Some(price) = price_override {
            if price <= 0 {
                return Err(CoreError::Validation(
                    "Slot price override must be a positive amount".into(),
                ));
            }
        }
        Ok(Self {
            id: Uuid::new_v4(),
            turf_id,
            date,
            range,
            price_override,
            status: SlotStatus::Available,
            booked_by: None,
            created_at: Utc::now(),
        })
    }

    pub fn mark_booked(&mut self, booking_id: Uuid) {
        self.status = SlotStatus::Booked;
        self.booked_by = Some(booking_id);
    }

    pub fn release(&mut self) {
        self.status = SlotStatus::Available;
        self.booked_by = None;
    }
}
