use chrono::{DateTime, Utc};
use pitchbase_core::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Match format the turf is laid out for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurfFormat {
    FiveASide,
    SevenASide,
    ElevenASide,
}

impl TurfFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurfFormat::FiveASide => "FIVE_A_SIDE",
            TurfFormat::SevenASide => "SEVEN_A_SIDE",
            TurfFormat::ElevenASide => "ELEVEN_A_SIDE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "FIVE_A_SIDE" => Some(TurfFormat::FiveASide),
            "SEVEN_A_SIDE" => Some(TurfFormat::SevenASide),
            "ELEVEN_A_SIDE" => Some(TurfFormat::ElevenASide),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurfStatus {
    Active,
    PendingVerification,
    Maintenance,
    Suspended,
}

impl TurfStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurfStatus::Active => "ACTIVE",
            TurfStatus::PendingVerification => "PENDING_VERIFICATION",
            TurfStatus::Maintenance => "MAINTENANCE",
            TurfStatus::Suspended => "SUSPENDED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(TurfStatus::Active),
            "PENDING_VERIFICATION" => Some(TurfStatus::PendingVerification),
            "MAINTENANCE" => Some(TurfStatus::Maintenance),
            "SUSPENDED" => Some(TurfStatus::Suspended),
            _ => None,
        }
    }
}

/// A bookable venue. Rating is derived from reviews elsewhere and is never
/// settable through catalog operations; turfs are archived via `Suspended`,
/// never hard-deleted, so bookings keep a valid reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turf {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub location: String,
    pub format: TurfFormat,
    /// Base price per hour, smallest currency unit.
    pub hourly_price: i64,
    pub description: Option<String>,
    pub amenities: BTreeSet<String>,
    pub status: TurfStatus,
    pub verified: bool,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for turf creation.
#[derive(Debug, Clone, Deserialize)]
pub struct TurfDraft {
    pub name: String,
    pub location: String,
    pub format: TurfFormat,
    pub hourly_price: i64,
    pub description: Option<String>,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
}

/// Owner-editable fields. Status changes go through `set_turf_status`, and
/// price edits never rewrite existing slot overrides or bookings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TurfPatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub format: Option<TurfFormat>,
    pub hourly_price: Option<i64>,
    pub description: Option<String>,
    pub amenities: Option<BTreeSet<String>>,
}

impl Turf {
    pub fn new(owner_id: &str, draft: TurfDraft, verified_import: bool) -> CoreResult<Self> {
        if draft.name.trim().is_empty() {
            return Err(CoreError::Validation("Turf name is required".into()));
        }
        if draft.location.trim().is_empty() {
            return Err(CoreError::Validation("Turf location is required".into()));
        }
        if draft.hourly_price <= 0 {
            return Err(CoreError::Validation(
                "Hourly price must be a positive amount".into(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            name: draft.name,
            location: draft.location,
            format: draft.format,
            hourly_price: draft.hourly_price,
            description: draft.description,
            amenities: draft.amenities,
            status: if verified_import {
                TurfStatus::Active
            } else {
                TurfStatus::PendingVerification
            },
            verified: verified_import,
            rating: 0.0,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, patch: TurfPatch) -> CoreResult<()> {
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(CoreError::Validation("Turf name is required".into()));
            }
            self.name = name;
        }
        if let Some(location) = patch.location {
            if location.trim().is_empty() {
                return Err(CoreError::Validation("Turf location is required".into()));
            }
            self.location = location;
        }
        if let Some(format) = patch.format {
            self.format = format;
        }
        if let Some(price) = patch.hourly_price {
            if price <= 0 {
                return Err(CoreError::Validation(
                    "Hourly price must be a positive amount".into(),
                ));
            }
            self.hourly_price = price;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(amenities) = patch.amenities {
            self.amenities = amenities;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}
