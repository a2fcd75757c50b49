use async_trait::async_trait;
use chrono::NaiveDate;
use pitchbase_core::CoreResult;
use serde::Deserialize;
use uuid::Uuid;

use crate::slot::TimeSlot;
use crate::turf::{Turf, TurfStatus};

/// Catalog listing filter. `search_text` is a case-insensitive substring
/// match on turf name, location, or id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TurfFilter {
    pub status: Option<TurfStatus>,
    pub owner_id: Option<String>,
    pub location: Option<String>,
    pub search_text: Option<String>,
}

/// Data access for turfs and their time slots. Slots are composed into their
/// turf: deleting a turf is not part of the contract at all (archival goes
/// through status), and slot rows never outlive their turf row.
#[async_trait]
pub trait TurfRepository: Send + Sync {
    async fn insert_turf(&self, turf: &Turf) -> CoreResult<()>;

    async fn get_turf(&self, id: Uuid) -> CoreResult<Option<Turf>>;

    async fn update_turf(&self, turf: &Turf) -> CoreResult<()>;

    async fn list_turfs(&self, filter: &TurfFilter) -> CoreResult<Vec<Turf>>;

    async fn insert_slot(&self, slot: &TimeSlot) -> CoreResult<()>;

    async fn get_slot(&self, id: Uuid) -> CoreResult<Option<TimeSlot>>;

    async fn update_slot(&self, slot: &TimeSlot) -> CoreResult<()>;

    async fn delete_slot(&self, id: Uuid) -> CoreResult<()>;

    async fn list_slots(&self, turf_id: Uuid, date: Option<NaiveDate>) -> CoreResult<Vec<TimeSlot>>;

    async fn list_slots_between(
        &self,
        turf_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> CoreResult<Vec<TimeSlot>>;
}
