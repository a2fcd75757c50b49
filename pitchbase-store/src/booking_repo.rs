use async_trait::async_trait;
use chrono::NaiveDate;
use pitchbase_booking::{Booking, BookingFilter, BookingRepository, BookingStatus, PaymentProgress};
use pitchbase_core::{CoreError, CoreResult};
use pitchbase_payment::PaymentMethod;
use pitchbase_shared::pii::Masked;
use pitchbase_shared::TimeRange;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db_err;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    turf_id: Uuid,
    slot_id: Option<Uuid>,
    booking_date: NaiveDate,
    start_minute: i32,
    end_minute: i32,
    duration_hours: i32,
    player_id: String,
    player_name: String,
    player_email: String,
    player_phone: String,
    total_amount: i64,
    paid_amount: i64,
    status: String,
    payment_progress: String,
    payment_method: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = CoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            turf_id: row.turf_id,
            slot_id: row.slot_id,
            date: row.booking_date,
            range: TimeRange::from_minutes(row.start_minute, row.end_minute)
                .map_err(|e| CoreError::Internal(format!("Corrupt booking range: {}", e)))?,
            duration_hours: row.duration_hours as u32,
            player_id: row.player_id,
            player_name: row.player_name,
            player_email: Masked(row.player_email),
            player_phone: Masked(row.player_phone),
            total_amount: row.total_amount,
            paid_amount: row.paid_amount,
            status: BookingStatus::parse(&row.status).ok_or_else(|| {
                CoreError::Internal(format!("Unknown booking status {}", row.status))
            })?,
            payment_progress: PaymentProgress::parse(&row.payment_progress).ok_or_else(|| {
                CoreError::Internal(format!(
                    "Unknown payment progress {}",
                    row.payment_progress
                ))
            })?,
            payment_method: match row.payment_method {
                Some(m) => Some(PaymentMethod::parse(&m).ok_or_else(|| {
                    CoreError::Internal(format!("Unknown payment method {}", m))
                })?),
                None => None,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const BOOKING_COLUMNS: &str = "id, turf_id, slot_id, booking_date, start_minute, end_minute, \
     duration_hours, player_id, player_name, player_email, player_phone, total_amount, \
     paid_amount, status, payment_progress, payment_method, created_at, updated_at";

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn insert(&self, booking: &Booking) -> CoreResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO bookings (id, turf_id, slot_id, booking_date, start_minute, end_minute,
                                  duration_hours, player_id, player_name, player_email,
                                  player_phone, total_amount, paid_amount, status,
                                  payment_progress, payment_method, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(booking.id)
        .bind(booking.turf_id)
        .bind(booking.slot_id)
        .bind(booking.date)
        .bind(booking.range.start_minute())
        .bind(booking.range.end_minute())
        .bind(booking.duration_hours as i32)
        .bind(&booking.player_id)
        .bind(&booking.player_name)
        .bind(booking.player_email.inner())
        .bind(booking.player_phone.inner())
        .bind(booking.total_amount)
        .bind(booking.paid_amount)
        .bind(booking.status.as_str())
        .bind(booking.payment_progress.as_str())
        .bind(booking.payment_method.map(|m| m.as_str()))
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            // The exclusion constraint on active bookings is the storage-level
            // backstop for the ledger's lock; surface it as the same error.
            Err(sqlx::Error::Database(e)) if e.constraint() == Some("bookings_no_overlap") => {
                Err(CoreError::SlotUnavailable(format!(
                    "The window {} on {} is already taken",
                    booking.range, booking.date
                )))
            }
            Err(e) => Err(db_err(e)),
        }
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<Booking>> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings WHERE id = $1",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.map(Booking::try_from).transpose()
    }

    async fn update(&self, booking: &Booking) -> CoreResult<()> {
        sqlx::query(
            r#"
            UPDATE bookings
            SET paid_amount = $1, status = $2, payment_progress = $3, payment_method = $4,
                updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(booking.paid_amount)
        .bind(booking.status.as_str())
        .bind(booking.payment_progress.as_str())
        .bind(booking.payment_method.map(|m| m.as_str()))
        .bind(booking.updated_at)
        .bind(booking.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn list_active_for_turf_date(
        &self,
        turf_id: Uuid,
        date: NaiveDate,
    ) -> CoreResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings WHERE turf_id = $1 AND booking_date = $2 \
             AND status IN ('PENDING', 'CONFIRMED')",
            BOOKING_COLUMNS
        ))
        .bind(turf_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn list_for_turfs(
        &self,
        turf_ids: &[Uuid],
        filter: &BookingFilter,
    ) -> CoreResult<Vec<Booking>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM bookings WHERE turf_id = ANY(",
            BOOKING_COLUMNS
        ));
        qb.push_bind(turf_ids.to_vec()).push(")");

        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(from) = filter.date_from {
            qb.push(" AND booking_date >= ").push_bind(from);
        }
        if let Some(to) = filter.date_to {
            qb.push(" AND booking_date <= ").push_bind(to);
        }
        if let Some(q) = &filter.search_text {
            let pattern = format!("%{}%", q);
            qb.push(" AND (id::text ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR player_id ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR player_name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY created_at DESC");

        let rows: Vec<BookingRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn list_for_player(&self, player_id: &str) -> CoreResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings WHERE player_id = $1 ORDER BY created_at DESC",
            BOOKING_COLUMNS
        ))
        .bind(player_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(Booking::try_from).collect()
    }
}
