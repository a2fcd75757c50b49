use async_trait::async_trait;
use chrono::NaiveDate;
use pitchbase_catalog::{SlotStatus, TimeSlot, Turf, TurfFilter, TurfFormat, TurfRepository, TurfStatus};
use pitchbase_core::{CoreError, CoreResult};
use pitchbase_shared::TimeRange;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db_err;

pub struct PgTurfRepository {
    pool: PgPool,
}

impl PgTurfRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TurfRow {
    id: Uuid,
    owner_id: String,
    name: String,
    location: String,
    format: String,
    hourly_price: i64,
    description: Option<String>,
    amenities: Vec<String>,
    status: String,
    verified: bool,
    rating: f64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<TurfRow> for Turf {
    type Error = CoreError;

    fn try_from(row: TurfRow) -> Result<Self, Self::Error> {
        Ok(Turf {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            location: row.location,
            format: TurfFormat::parse(&row.format)
                .ok_or_else(|| CoreError::Internal(format!("Unknown turf format {}", row.format)))?,
            hourly_price: row.hourly_price,
            description: row.description,
            amenities: row.amenities.into_iter().collect(),
            status: TurfStatus::parse(&row.status)
                .ok_or_else(|| CoreError::Internal(format!("Unknown turf status {}", row.status)))?,
            verified: row.verified,
            rating: row.rating,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SlotRow {
    id: Uuid,
    turf_id: Uuid,
    slot_date: NaiveDate,
    start_minute: i32,
    end_minute: i32,
    price_override: Option<i64>,
    status: String,
    booked_by: Option<Uuid>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<SlotRow> for TimeSlot {
    type Error = CoreError;

    fn try_from(row: SlotRow) -> Result<Self, Self::Error> {
        Ok(TimeSlot {
            id: row.id,
            turf_id: row.turf_id,
            date: row.slot_date,
            range: TimeRange::from_minutes(row.start_minute, row.end_minute)
                .map_err(|e| CoreError::Internal(format!("Corrupt slot range: {}", e)))?,
            price_override: row.price_override,
            status: SlotStatus::parse(&row.status)
                .ok_or_else(|| CoreError::Internal(format!("Unknown slot status {}", row.status)))?,
            booked_by: row.booked_by,
            created_at: row.created_at,
        })
    }
}

const TURF_COLUMNS: &str = "id, owner_id, name, location, format, hourly_price, description, \
     amenities, status, verified, rating, created_at, updated_at";

const SLOT_COLUMNS: &str =
    "id, turf_id, slot_date, start_minute, end_minute, price_override, status, booked_by, created_at";

#[async_trait]
impl TurfRepository for PgTurfRepository {
    async fn insert_turf(&self, turf: &Turf) -> CoreResult<()> {
        let amenities: Vec<String> = turf.amenities.iter().cloned().collect();
        sqlx::query(
            r#"
            INSERT INTO turfs (id, owner_id, name, location, format, hourly_price, description,
                               amenities, status, verified, rating, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(turf.id)
        .bind(&turf.owner_id)
        .bind(&turf.name)
        .bind(&turf.location)
        .bind(turf.format.as_str())
        .bind(turf.hourly_price)
        .bind(&turf.description)
        .bind(&amenities)
        .bind(turf.status.as_str())
        .bind(turf.verified)
        .bind(turf.rating)
        .bind(turf.created_at)
        .bind(turf.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get_turf(&self, id: Uuid) -> CoreResult<Option<Turf>> {
        let row: Option<TurfRow> =
            sqlx::query_as(&format!("SELECT {} FROM turfs WHERE id = $1", TURF_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;
        row.map(Turf::try_from).transpose()
    }

    async fn update_turf(&self, turf: &Turf) -> CoreResult<()> {
        let amenities: Vec<String> = turf.amenities.iter().cloned().collect();
        sqlx::query(
            r#"
            UPDATE turfs
            SET name = $1, location = $2, format = $3, hourly_price = $4, description = $5,
                amenities = $6, status = $7, verified = $8, rating = $9, updated_at = $10
            WHERE id = $11
            "#,
        )
        .bind(&turf.name)
        .bind(&turf.location)
        .bind(turf.format.as_str())
        .bind(turf.hourly_price)
        .bind(&turf.description)
        .bind(&amenities)
        .bind(turf.status.as_str())
        .bind(turf.verified)
        .bind(turf.rating)
        .bind(turf.updated_at)
        .bind(turf.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn list_turfs(&self, filter: &TurfFilter) -> CoreResult<Vec<Turf>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM turfs WHERE 1=1", TURF_COLUMNS));

        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(owner_id) = &filter.owner_id {
            qb.push(" AND owner_id = ").push_bind(owner_id.clone());
        }
        if let Some(location) = &filter.location {
            qb.push(" AND location ILIKE ")
                .push_bind(format!("%{}%", location));
        }
        if let Some(q) = &filter.search_text {
            let pattern = format!("%{}%", q);
            qb.push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR location ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR id::text ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY created_at DESC");

        let rows: Vec<TurfRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.into_iter().map(Turf::try_from).collect()
    }

    async fn insert_slot(&self, slot: &TimeSlot) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO time_slots (id, turf_id, slot_date, start_minute, end_minute,
                                    price_override, status, booked_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(slot.id)
        .bind(slot.turf_id)
        .bind(slot.date)
        .bind(slot.range.start_minute())
        .bind(slot.range.end_minute())
        .bind(slot.price_override)
        .bind(slot.status.as_str())
        .bind(slot.booked_by)
        .bind(slot.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get_slot(&self, id: Uuid) -> CoreResult<Option<TimeSlot>> {
        let row: Option<SlotRow> = sqlx::query_as(&format!(
            "SELECT {} FROM time_slots WHERE id = $1",
            SLOT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.map(TimeSlot::try_from).transpose()
    }

    async fn update_slot(&self, slot: &TimeSlot) -> CoreResult<()> {
        sqlx::query(
            r#"
            UPDATE time_slots
            SET slot_date = $1, start_minute = $2, end_minute = $3, price_override = $4,
                status = $5, booked_by = $6
            WHERE id = $7
            "#,
        )
        .bind(slot.date)
        .bind(slot.range.start_minute())
        .bind(slot.range.end_minute())
        .bind(slot.price_override)
        .bind(slot.status.as_str())
        .bind(slot.booked_by)
        .bind(slot.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn delete_slot(&self, id: Uuid) -> CoreResult<()> {
        sqlx::query("DELETE FROM time_slots WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list_slots(&self, turf_id: Uuid, date: Option<NaiveDate>) -> CoreResult<Vec<TimeSlot>> {
        let rows: Vec<SlotRow> = match date {
            Some(date) => sqlx::query_as(&format!(
                "SELECT {} FROM time_slots WHERE turf_id = $1 AND slot_date = $2 \
                 ORDER BY slot_date, start_minute",
                SLOT_COLUMNS
            ))
            .bind(turf_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?,
            None => sqlx::query_as(&format!(
                "SELECT {} FROM time_slots WHERE turf_id = $1 ORDER BY slot_date, start_minute",
                SLOT_COLUMNS
            ))
            .bind(turf_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?,
        };
        rows.into_iter().map(TimeSlot::try_from).collect()
    }

    async fn list_slots_between(
        &self,
        turf_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> CoreResult<Vec<TimeSlot>> {
        let rows: Vec<SlotRow> = sqlx::query_as(&format!(
            "SELECT {} FROM time_slots WHERE turf_id = $1 AND slot_date BETWEEN $2 AND $3 \
             ORDER BY slot_date, start_minute",
            SLOT_COLUMNS
        ))
        .bind(turf_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(TimeSlot::try_from).collect()
    }
}
