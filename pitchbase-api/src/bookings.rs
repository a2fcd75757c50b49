use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use pitchbase_booking::{Booking, BookingDraft, BookingFilter};
use pitchbase_core::{AuthContext, CoreError};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking))
        .route("/v1/bookings/mine", get(list_mine))
        .route("/v1/bookings/{id}", get(get_booking))
        .route("/v1/bookings/{id}/accept", post(accept_booking))
        .route("/v1/bookings/{id}/reject", post(reject_booking))
        .route("/v1/bookings/{id}/cancel", post(cancel_booking))
        .route("/v1/owners/{owner_id}/bookings", get(list_for_owner))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(draft): Json<BookingDraft>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.bookings.create_booking(&ctx, draft).await?;
    Ok(Json(booking))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.bookings.get_booking(id).await?;

    // Visible to the player, the turf owner, and admins only.
    if !ctx.is_admin() && ctx.user_id != booking.player_id {
        let turf = state.catalog.get_turf(booking.turf_id).await?;
        if !ctx.owns(&turf.owner_id) {
            return Err(CoreError::Forbidden("Not your booking".into()).into());
        }
    }
    Ok(Json(booking))
}

async fn accept_booking(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.bookings.accept_booking(&ctx, id).await?;
    Ok(Json(booking))
}

#[derive(Debug, Default, Deserialize)]
struct RejectBody {
    reason: Option<String>,
}

async fn reject_booking(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(body): Json<RejectBody>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.bookings.reject_booking(&ctx, id, body.reason).await?;
    Ok(Json(booking))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.bookings.cancel_booking(&ctx, id).await?;
    Ok(Json(booking))
}

async fn list_mine(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.bookings.list_for_player(&ctx.user_id).await?))
}

async fn list_for_owner(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(owner_id): Path<String>,
    Query(filter): Query<BookingFilter>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = state
        .bookings
        .list_for_owner(&ctx, &owner_id, &filter)
        .await?;
    Ok(Json(bookings))
}
