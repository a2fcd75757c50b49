use async_trait::async_trait;
use chrono::NaiveDate;
use pitchbase_core::CoreResult;
use serde::Deserialize;
use uuid::Uuid;

use crate::model::{Booking, BookingStatus};

/// Owner-side listing filter. `search_text` is a case-insensitive substring
/// match on booking id, player id, or player name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search_text: Option<String>,
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: &Booking) -> CoreResult<()>;

    async fn get(&self, id: Uuid) -> CoreResult<Option<Booking>>;

    async fn update(&self, booking: &Booking) -> CoreResult<()>;

    /// Bookings holding the calendar (PENDING or CONFIRMED) for one turf/date.
    /// This is the read side of the double-booking check and runs under the
    /// ledger's per-(turf, date) lock.
    async fn list_active_for_turf_date(
        &self,
        turf_id: Uuid,
        date: NaiveDate,
    ) -> CoreResult<Vec<Booking>>;

    async fn list_for_turfs(
        &self,
        turf_ids: &[Uuid],
        filter: &BookingFilter,
    ) -> CoreResult<Vec<Booking>>;

    async fn list_for_player(&self, player_id: &str) -> CoreResult<Vec<Booking>>;
}
