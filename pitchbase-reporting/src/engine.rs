use chrono::NaiveDate;
use pitchbase_booking::{BookingFilter, BookingRepository, BookingStatus};
use pitchbase_catalog::{TurfFilter, TurfRepository};
use pitchbase_payment::{PaymentRepository, PaymentState};
use pitchbase_core::CoreResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Inclusive calendar-day window for report queries.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Per-player aggregate over one owner's turfs. Recomputed on read, never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerRollup {
    pub player_id: String,
    pub player_name: String,
    pub total_bookings: u64,
    /// Sum of CONFIRMED booking totals, smallest currency unit.
    pub total_spent: i64,
    pub last_booking_date: NaiveDate,
}

/// Aggregation Engine: read-only derived views over the catalog and the two
/// ledgers. Any inconsistency surfacing here is a ledger bug, not a report
/// bug, so nothing in this module mutates state or papers over bad data.
pub struct ReportingEngine {
    turfs: Arc<dyn TurfRepository>,
    bookings: Arc<dyn BookingRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl ReportingEngine {
    pub fn new(
        turfs: Arc<dyn TurfRepository>,
        bookings: Arc<dyn BookingRepository>,
        payments: Arc<dyn PaymentRepository>,
    ) -> Self {
        Self {
            turfs,
            bookings,
            payments,
        }
    }

    async fn owner_turf_ids(&self, owner_id: &str) -> CoreResult<Vec<Uuid>> {
        let turfs = self
            .turfs
            .list_turfs(&TurfFilter {
                owner_id: Some(owner_id.to_string()),
                ..Default::default()
            })
            .await?;
        Ok(turfs.into_iter().map(|t| t.id).collect())
    }

    /// Completed payment volume for an owner's turfs, by booking date.
    pub async fn revenue_for_owner(&self, owner_id: &str, range: DateRange) -> CoreResult<i64> {
        let turf_ids = self.owner_turf_ids(owner_id).await?;
        let bookings = self
            .bookings
            .list_for_turfs(
                &turf_ids,
                &BookingFilter {
                    date_from: Some(range.from),
                    date_to: Some(range.to),
                    ..Default::default()
                },
            )
            .await?;

        let mut revenue = 0i64;
        for booking in &bookings {
            revenue += self
                .payments
                .list_for_booking(booking.id)
                .await?
                .iter()
                .filter(|p| p.state == PaymentState::Completed)
                .map(|p| p.amount)
                .sum::<i64>();
        }
        Ok(revenue)
    }

    /// Booked slot-hours over defined slot-hours for one turf in a window.
    /// 0.0 when the turf has no slots there. Maintenance/blocked slots are
    /// off the calendar and count on neither side.
    pub async fn occupancy_for_turf(&self, turf_id: Uuid, range: DateRange) -> CoreResult<f64> {
        let slots = self
            .turfs
            .list_slots_between(turf_id, range.from, range.to)
            .await?;

        let mut total_minutes = 0i64;
        let mut booked_minutes = 0i64;
        for slot in &slots {
            if !slot.status.occupies_calendar() {
                continue;
            }
            let minutes = slot.range.duration_minutes();
            total_minutes += minutes;
            if slot.status == pitchbase_catalog::SlotStatus::Booked {
                booked_minutes += minutes;
            }
        }

        if total_minutes == 0 {
            return Ok(0.0);
        }
        Ok(booked_minutes as f64 / total_minutes as f64)
    }

    /// Group an owner's bookings by player: count, confirmed spend, last
    /// booking date. Sorted by spend, highest first.
    pub async fn customer_rollup(&self, owner_id: &str) -> CoreResult<Vec<CustomerRollup>> {
        let turf_ids = self.owner_turf_ids(owner_id).await?;
        let bookings = self
            .bookings
            .list_for_turfs(&turf_ids, &BookingFilter::default())
            .await?;

        let mut by_player: HashMap<String, CustomerRollup> = HashMap::new();
        for booking in bookings {
            let entry = by_player
                .entry(booking.player_id.clone())
                .or_insert_with(|| CustomerRollup {
                    player_id: booking.player_id.clone(),
                    player_name: booking.player_name.clone(),
                    total_bookings: 0,
                    total_spent: 0,
                    last_booking_date: booking.date,
                });
            entry.total_bookings += 1;
            if booking.status == BookingStatus::Confirmed {
                entry.total_spent += booking.total_amount;
            }
            if booking.date > entry.last_booking_date {
                entry.last_booking_date = booking.date;
                entry.player_name = booking.player_name.clone();
            }
        }

        let mut rollups: Vec<CustomerRollup> = by_player.into_values().collect();
        rollups.sort_by(|a, b| b.total_spent.cmp(&a.total_spent));
        Ok(rollups)
    }
}
