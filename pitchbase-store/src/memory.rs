use async_trait::async_trait;
use chrono::NaiveDate;
use pitchbase_booking::{Booking, BookingFilter, BookingRepository};
use pitchbase_catalog::{TimeSlot, Turf, TurfFilter, TurfRepository};
use pitchbase_core::CoreResult;
use pitchbase_payment::{Payment, PaymentRepository};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory backend for development mode and tests. Implements all three
/// repository traits over plain hash maps; share one instance via `Arc` and
/// coerce it per trait.
#[derive(Default)]
pub struct MemoryStore {
    turfs: RwLock<HashMap<Uuid, Turf>>,
    slots: RwLock<HashMap<Uuid, TimeSlot>>,
    bookings: RwLock<HashMap<Uuid, Booking>>,
    payments: RwLock<HashMap<Uuid, Payment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl TurfRepository for MemoryStore {
    async fn insert_turf(&self, turf: &Turf) -> CoreResult<()> {
        self.turfs.write().await.insert(turf.id, turf.clone());
        Ok(())
    }

    async fn get_turf(&self, id: Uuid) -> CoreResult<Option<Turf>> {
        Ok(self.turfs.read().await.get(&id).cloned())
    }

    async fn update_turf(&self, turf: &Turf) -> CoreResult<()> {
        self.turfs.write().await.insert(turf.id, turf.clone());
        Ok(())
    }

    async fn list_turfs(&self, filter: &TurfFilter) -> CoreResult<Vec<Turf>> {
        let turfs = self.turfs.read().await;
        let mut result: Vec<Turf> = turfs
            .values()
            .filter(|t| filter.status.map_or(true, |s| t.status == s))
            .filter(|t| {
                filter
                    .owner_id
                    .as_ref()
                    .map_or(true, |owner| &t.owner_id == owner)
            })
            .filter(|t| {
                filter
                    .location
                    .as_ref()
                    .map_or(true, |loc| contains_ci(&t.location, loc))
            })
            .filter(|t| {
                filter.search_text.as_ref().map_or(true, |q| {
                    contains_ci(&t.name, q)
                        || contains_ci(&t.location, q)
                        || contains_ci(&t.id.to_string(), q)
                })
            })
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn insert_slot(&self, slot: &TimeSlot) -> CoreResult<()> {
        self.slots.write().await.insert(slot.id, slot.clone());
        Ok(())
    }

    async fn get_slot(&self, id: Uuid) -> CoreResult<Option<TimeSlot>> {
        Ok(self.slots.read().await.get(&id).cloned())
    }

    async fn update_slot(&self, slot: &TimeSlot) -> CoreResult<()> {
        self.slots.write().await.insert(slot.id, slot.clone());
        Ok(())
    }

    async fn delete_slot(&self, id: Uuid) -> CoreResult<()> {
        self.slots.write().await.remove(&id);
        Ok(())
    }

    async fn list_slots(&self, turf_id: Uuid, date: Option<NaiveDate>) -> CoreResult<Vec<TimeSlot>> {
        let slots = self.slots.read().await;
        let mut result: Vec<TimeSlot> = slots
            .values()
            .filter(|s| s.turf_id == turf_id)
            .filter(|s| date.map_or(true, |d| s.date == d))
            .cloned()
            .collect();
        result.sort_by_key(|s| (s.date, s.range.start_minute()));
        Ok(result)
    }

    async fn list_slots_between(
        &self,
        turf_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> CoreResult<Vec<TimeSlot>> {
        let slots = self.slots.read().await;
        let mut result: Vec<TimeSlot> = slots
            .values()
            .filter(|s| s.turf_id == turf_id && s.date >= from && s.date <= to)
            .cloned()
            .collect();
        result.sort_by_key(|s| (s.date, s.range.start_minute()));
        Ok(result)
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn insert(&self, booking: &Booking) -> CoreResult<()> {
        self.bookings
            .write()
            .await
            .insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<Booking>> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn update(&self, booking: &Booking) -> CoreResult<()> {
        self.bookings
            .write()
            .await
            .insert(booking.id, booking.clone());
        Ok(())
    }

    async fn list_active_for_turf_date(
        &self,
        turf_id: Uuid,
        date: NaiveDate,
    ) -> CoreResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .values()
            .filter(|b| b.turf_id == turf_id && b.date == date && b.status.holds_slot())
            .cloned()
            .collect())
    }

    async fn list_for_turfs(
        &self,
        turf_ids: &[Uuid],
        filter: &BookingFilter,
    ) -> CoreResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        let mut result: Vec<Booking> = bookings
            .values()
            .filter(|b| turf_ids.contains(&b.turf_id))
            .filter(|b| filter.status.map_or(true, |s| b.status == s))
            .filter(|b| filter.date_from.map_or(true, |d| b.date >= d))
            .filter(|b| filter.date_to.map_or(true, |d| b.date <= d))
            .filter(|b| {
                filter.search_text.as_ref().map_or(true, |q| {
                    contains_ci(&b.id.to_string(), q)
                        || contains_ci(&b.player_id, q)
                        || contains_ci(&b.player_name, q)
                })
            })
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn list_for_player(&self, player_id: &str) -> CoreResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        let mut result: Vec<Booking> = bookings
            .values()
            .filter(|b| b.player_id == player_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }
}

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn insert(&self, payment: &Payment) -> CoreResult<()> {
        self.payments
            .write()
            .await
            .insert(payment.id, payment.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<Payment>> {
        Ok(self.payments.read().await.get(&id).cloned())
    }

    async fn update(&self, payment: &Payment) -> CoreResult<()> {
        self.payments
            .write()
            .await
            .insert(payment.id, payment.clone());
        Ok(())
    }

    async fn list_for_booking(&self, booking_id: Uuid) -> CoreResult<Vec<Payment>> {
        let payments = self.payments.read().await;
        let mut result: Vec<Payment> = payments
            .values()
            .filter(|p| p.booking_id == booking_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(result)
    }
}
