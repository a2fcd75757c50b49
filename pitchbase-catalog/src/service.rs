use chrono::NaiveDate;
use pitchbase_core::{AuthContext, CoreError, CoreResult};
use pitchbase_shared::TimeRange;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::repository::{TurfFilter, TurfRepository};
use crate::slot::{SlotStatus, TimeSlot};
use crate::turf::{Turf, TurfDraft, TurfPatch, TurfStatus};

/// Turf Catalog operations: turf CRUD, slot CRUD, and the per-turf
/// invariants (price positivity, slot non-overlap, owner/admin moderation).
pub struct CatalogService {
    repo: Arc<dyn TurfRepository>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn TurfRepository>) -> Self {
        Self { repo }
    }

    /// Create a turf for the calling owner. Admin callers create pre-verified
    /// turfs (seeded imports); everyone else starts in PENDING_VERIFICATION.
    pub async fn create_turf(&self, ctx: &AuthContext, draft: TurfDraft) -> CoreResult<Turf> {
        let turf = Turf::new(&ctx.user_id, draft, ctx.is_admin())?;
        self.repo.insert_turf(&turf).await?;
        info!("Turf {} created by {} ({:?})", turf.id, ctx.user_id, turf.status);
        Ok(turf)
    }

    pub async fn get_turf(&self, turf_id: Uuid) -> CoreResult<Turf> {
        self.repo
            .get_turf(turf_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Turf {}", turf_id)))
    }

    /// Owner edits. Price changes apply to future pricing only; existing slot
    /// overrides and booking totals are untouched.
    pub async fn update_turf(
        &self,
        ctx: &AuthContext,
        turf_id: Uuid,
        patch: TurfPatch,
    ) -> CoreResult<Turf> {
        let mut turf = self.get_turf(turf_id).await?;
        ctx.require_owner_of(&turf.owner_id, "this turf")?;

        turf.apply(patch)?;
        self.repo.update_turf(&turf).await?;
        Ok(turf)
    }

    /// Moderation state machine:
    /// - ACTIVE / SUSPENDED are admin decisions (approval, reinstatement,
    ///   suspension), except leaving the owner's own MAINTENANCE window.
    /// - MAINTENANCE is toggled by the owner on an active turf.
    /// - PENDING_VERIFICATION is never a target.
    pub async fn set_turf_status(
        &self,
        ctx: &AuthContext,
        turf_id: Uuid,
        status: TurfStatus,
    ) -> CoreResult<Turf> {
        let mut turf = self.get_turf(turf_id).await?;

        if turf.status == status {
            return Err(CoreError::InvalidState {
                from: turf.status.as_str().to_string(),
                to: status.as_str().to_string(),
            });
        }

        match status {
            TurfStatus::Active => {
                if turf.status == TurfStatus::Maintenance {
                    ctx.require_owner_of(&turf.owner_id, "this turf")?;
                } else {
                    ctx.require_admin("Activating a turf")?;
                    turf.verified = true;
                }
            }
            TurfStatus::Suspended => {
                ctx.require_admin("Suspending a turf")?;
            }
            TurfStatus::Maintenance => {
                ctx.require_owner_of(&turf.owner_id, "this turf")?;
                if turf.status != TurfStatus::Active {
                    return Err(CoreError::InvalidState {
                        from: turf.status.as_str().to_string(),
                        to: status.as_str().to_string(),
                    });
                }
            }
            TurfStatus::PendingVerification => {
                return Err(CoreError::Validation(
                    "PENDING_VERIFICATION cannot be set directly".into(),
                ));
            }
        }

        info!(
            "Turf {} status {} -> {} by {}",
            turf.id,
            turf.status.as_str(),
            status.as_str(),
            ctx.user_id
        );
        turf.status = status;
        turf.updated_at = chrono::Utc::now();
        self.repo.update_turf(&turf).await?;
        Ok(turf)
    }

    pub async fn list_turfs(&self, filter: &TurfFilter) -> CoreResult<Vec<Turf>> {
        self.repo.list_turfs(filter).await
    }

    /// Add a slot for a turf/date. Rejects ranges overlapping any existing
    /// available or booked slot on that date.
    pub async fn add_time_slot(
        &self,
        ctx: &AuthContext,
        turf_id: Uuid,
        date: NaiveDate,
        range: TimeRange,
        price_override: Option<i64>,
    ) -> CoreResult<TimeSlot> {
        let turf = self.get_turf(turf_id).await?;
        ctx.require_owner_of(&turf.owner_id, "this turf")?;

        let existing = self.repo.list_slots(turf_id, Some(date)).await?;
        if let Some(clash) = existing
            .iter()
            .find(|s| s.status.occupies_calendar() && s.range.overlaps(&range))
        {
            return Err(CoreError::Conflict(format!(
                "Slot {} overlaps existing slot {} ({})",
                range, clash.id, clash.range
            )));
        }

        let slot = TimeSlot::new(turf_id, date, range, price_override)?;
        self.repo.insert_slot(&slot).await?;
        Ok(slot)
    }

    /// Remove a slot. A booked slot cannot be removed; the booking must be
    /// rejected or cancelled first, which releases the slot.
    pub async fn remove_time_slot(&self, ctx: &AuthContext, slot_id: Uuid) -> CoreResult<()> {
        let slot = self
            .repo
            .get_slot(slot_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Slot {}", slot_id)))?;
        let turf = self.get_turf(slot.turf_id).await?;
        ctx.require_owner_of(&turf.owner_id, "this turf")?;

        if slot.status == SlotStatus::Booked {
            return Err(CoreError::Conflict(format!(
                "Slot {} is booked by booking {:?}; resolve the booking first",
                slot_id, slot.booked_by
            )));
        }

        self.repo.delete_slot(slot_id).await
    }

    pub async fn list_slots(
        &self,
        turf_id: Uuid,
        date: Option<NaiveDate>,
    ) -> CoreResult<Vec<TimeSlot>> {
        // Listing for an unknown turf is a NotFound, not an empty list.
        self.get_turf(turf_id).await?;
        self.repo.list_slots(turf_id, date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::TurfFilter;
    use crate::turf::{TurfDraft, TurfFormat};
    use async_trait::async_trait;
    use pitchbase_core::Role;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryCatalog {
        turfs: Mutex<HashMap<Uuid, Turf>>,
        slots: Mutex<HashMap<Uuid, TimeSlot>>,
    }

    #[async_trait]
    impl TurfRepository for InMemoryCatalog {
        async fn insert_turf(&self, turf: &Turf) -> CoreResult<()> {
            self.turfs.lock().unwrap().insert(turf.id, turf.clone());
            Ok(())
        }

        async fn get_turf(&self, id: Uuid) -> CoreResult<Option<Turf>> {
            Ok(self.turfs.lock().unwrap().get(&id).cloned())
        }

        async fn update_turf(&self, turf: &Turf) -> CoreResult<()> {
            self.turfs.lock().unwrap().insert(turf.id, turf.clone());
            Ok(())
        }

        async fn list_turfs(&self, _filter: &TurfFilter) -> CoreResult<Vec<Turf>> {
            Ok(self.turfs.lock().unwrap().values().cloned().collect())
        }

        async fn insert_slot(&self, slot: &TimeSlot) -> CoreResult<()> {
            self.slots.lock().unwrap().insert(slot.id, slot.clone());
            Ok(())
        }

        async fn get_slot(&self, id: Uuid) -> CoreResult<Option<TimeSlot>> {
            Ok(self.slots.lock().unwrap().get(&id).cloned())
        }

        async fn update_slot(&self, slot: &TimeSlot) -> CoreResult<()> {
            self.slots.lock().unwrap().insert(slot.id, slot.clone());
            Ok(())
        }

        async fn delete_slot(&self, id: Uuid) -> CoreResult<()> {
            self.slots.lock().unwrap().remove(&id);
            Ok(())
        }

        async fn list_slots(
            &self,
            turf_id: Uuid,
            date: Option<NaiveDate>,
        ) -> CoreResult<Vec<TimeSlot>> {
            Ok(self
                .slots
                .lock()
                .unwrap()
                .values()
                .filter(|s| s.turf_id == turf_id && date.map_or(true, |d| s.date == d))
                .cloned()
                .collect())
        }

        async fn list_slots_between(
            &self,
            turf_id: Uuid,
            from: NaiveDate,
            to: NaiveDate,
        ) -> CoreResult<Vec<TimeSlot>> {
            Ok(self
                .slots
                .lock()
                .unwrap()
                .values()
                .filter(|s| s.turf_id == turf_id && s.date >= from && s.date <= to)
                .cloned()
                .collect())
        }
    }

    fn owner() -> AuthContext {
        AuthContext::new("owner-1", Role::Owner)
    }

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange::parse(start, end).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 12).unwrap()
    }

    async fn service_with_turf() -> (CatalogService, Arc<InMemoryCatalog>, Turf) {
        let repo = Arc::new(InMemoryCatalog::default());
        let service = CatalogService::new(repo.clone());
        let turf = service
            .create_turf(
                &owner(),
                TurfDraft {
                    name: "Champions Arena".to_string(),
                    location: "Riverside".to_string(),
                    format: TurfFormat::FiveASide,
                    hourly_price: 2500,
                    description: None,
                    amenities: Default::default(),
                },
            )
            .await
            .unwrap();
        (service, repo, turf)
    }

    #[tokio::test]
    async fn test_overlapping_slot_is_a_conflict() {
        let (service, _repo, turf) = service_with_turf().await;
        service
            .add_time_slot(&owner(), turf.id, day(), range("18:00", "19:00"), None)
            .await
            .unwrap();

        let err = service
            .add_time_slot(&owner(), turf.id, day(), range("18:30", "19:30"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));

        // Touching ranges do not overlap.
        service
            .add_time_slot(&owner(), turf.id, day(), range("19:00", "20:00"), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_booked_slot_cannot_be_removed() {
        let (service, repo, turf) = service_with_turf().await;
        let slot = service
            .add_time_slot(&owner(), turf.id, day(), range("18:00", "19:00"), None)
            .await
            .unwrap();

        let mut booked = repo.get_slot(slot.id).await.unwrap().unwrap();
        booked.mark_booked(Uuid::new_v4());
        repo.update_slot(&booked).await.unwrap();

        let err = service
            .remove_time_slot(&owner(), slot.id)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
        assert!(repo.get_slot(slot.id).await.unwrap().is_some());

        // Released again, removal goes through.
        let mut released = repo.get_slot(slot.id).await.unwrap().unwrap();
        released.release();
        repo.update_slot(&released).await.unwrap();
        service.remove_time_slot(&owner(), slot.id).await.unwrap();
        assert!(repo.get_slot(slot.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_only_the_owner_manages_slots() {
        let (service, _repo, turf) = service_with_turf().await;
        let stranger = AuthContext::new("owner-2", Role::Owner);

        let err = service
            .add_time_slot(&stranger, turf.id, day(), range("18:00", "19:00"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }
}
