use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use pitchbase_booking::Booking;
use pitchbase_payment::{Payment, PaymentMethod, PaymentState};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/bookings/{id}/payments",
            post(record_payment).get(list_payments),
        )
        .route("/v1/bookings/{id}/payments/intent", post(open_payment))
}

pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/v1/webhooks/payments", post(payment_webhook))
}

#[derive(Debug, Deserialize)]
struct PaymentBody {
    amount: i64,
    method: PaymentMethod,
}

/// Record an already settled payment (cash at the venue, a verified bank
/// transfer). Completes immediately and reconciles the booking.
async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PaymentBody>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .bookings
        .record_payment(id, body.amount, body.method)
        .await?;
    Ok(Json(booking))
}

#[derive(Debug, Serialize)]
struct PaymentIntentResponse {
    payment: Payment,
    processor_ref: String,
}

/// Open a pending payment and hand it to the processor; the webhook below
/// settles it.
async fn open_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PaymentBody>,
) -> Result<Json<PaymentIntentResponse>, AppError> {
    let payment = state
        .bookings
        .open_payment(id, body.amount, body.method)
        .await?;
    let processor_ref = state
        .processor
        .submit(payment.id, payment.amount, payment.method.as_str())
        .await?;
    Ok(Json(PaymentIntentResponse {
        payment,
        processor_ref,
    }))
}

async fn list_payments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Payment>>, AppError> {
    Ok(Json(state.payments.list_for_booking(id).await?))
}

#[derive(Debug, Deserialize)]
struct WebhookBody {
    payment_id: Uuid,
    status: PaymentState,
}

/// Processor callback. Marks the payment with the reported terminal state;
/// a completed payment is folded back into its booking. Replays of the same
/// terminal state are rejected by the ledger as INVALID_STATE.
async fn payment_webhook(
    State(state): State<AppState>,
    Json(body): Json<WebhookBody>,
) -> Result<Json<Payment>, AppError> {
    tracing::info!(
        "Processor webhook: payment {} -> {}",
        body.payment_id,
        body.status.as_str()
    );
    let payment = state
        .payments
        .mark_payment_status(body.payment_id, body.status)
        .await?;
    if payment.state == PaymentState::Completed {
        state.bookings.reconcile_payment(&payment).await?;
    }
    Ok(Json(payment))
}
