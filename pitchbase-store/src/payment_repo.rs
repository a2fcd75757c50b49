use async_trait::async_trait;
use pitchbase_core::{CoreError, CoreResult};
use pitchbase_payment::{Payment, PaymentMethod, PaymentRepository, PaymentState};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db_err;

pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    booking_id: Uuid,
    amount: i64,
    method: String,
    state: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = CoreError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: row.id,
            booking_id: row.booking_id,
            amount: row.amount,
            method: PaymentMethod::parse(&row.method)
                .ok_or_else(|| CoreError::Internal(format!("Unknown payment method {}", row.method)))?,
            state: PaymentState::parse(&row.state)
                .ok_or_else(|| CoreError::Internal(format!("Unknown payment state {}", row.state)))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const PAYMENT_COLUMNS: &str = "id, booking_id, amount, method, state, created_at, updated_at";

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn insert(&self, payment: &Payment) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (id, booking_id, amount, method, state, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(payment.id)
        .bind(payment.booking_id)
        .bind(payment.amount)
        .bind(payment.method.as_str())
        .bind(payment.state.as_str())
        .bind(payment.created_at)
        .bind(payment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<Payment>> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM payments WHERE id = $1",
            PAYMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.map(Payment::try_from).transpose()
    }

    async fn update(&self, payment: &Payment) -> CoreResult<()> {
        sqlx::query("UPDATE payments SET state = $1, updated_at = $2 WHERE id = $3")
            .bind(payment.state.as_str())
            .bind(payment.updated_at)
            .bind(payment.id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list_for_booking(&self, booking_id: Uuid) -> CoreResult<Vec<Payment>> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM payments WHERE booking_id = $1 ORDER BY created_at",
            PAYMENT_COLUMNS
        ))
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(Payment::try_from).collect()
    }
}
