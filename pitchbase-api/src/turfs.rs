use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use pitchbase_catalog::{TimeSlot, Turf, TurfDraft, TurfFilter, TurfPatch, TurfStatus};
use pitchbase_core::AuthContext;
use pitchbase_shared::TimeRange;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/turfs", post(create_turf).get(list_turfs))
        .route("/v1/turfs/{id}", get(get_turf).patch(update_turf))
        .route("/v1/turfs/{id}/status", put(set_status))
        .route("/v1/turfs/{id}/slots", post(add_slot).get(list_slots))
        .route("/v1/slots/{id}", delete(remove_slot))
}

async fn create_turf(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(draft): Json<TurfDraft>,
) -> Result<Json<Turf>, AppError> {
    let turf = state.catalog.create_turf(&ctx, draft).await?;
    Ok(Json(turf))
}

async fn get_turf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Turf>, AppError> {
    Ok(Json(state.catalog.get_turf(id).await?))
}

async fn list_turfs(
    State(state): State<AppState>,
    Query(filter): Query<TurfFilter>,
) -> Result<Json<Vec<Turf>>, AppError> {
    Ok(Json(state.catalog.list_turfs(&filter).await?))
}

async fn update_turf(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(patch): Json<TurfPatch>,
) -> Result<Json<Turf>, AppError> {
    let turf = state.catalog.update_turf(&ctx, id, patch).await?;
    Ok(Json(turf))
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: TurfStatus,
}

async fn set_status(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Turf>, AppError> {
    let turf = state.catalog.set_turf_status(&ctx, id, body.status).await?;
    Ok(Json(turf))
}

#[derive(Debug, Deserialize)]
struct SlotBody {
    date: NaiveDate,
    range: TimeRange,
    price_override: Option<i64>,
}

async fn add_slot(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(body): Json<SlotBody>,
) -> Result<Json<TimeSlot>, AppError> {
    let slot = state
        .catalog
        .add_time_slot(&ctx, id, body.date, body.range, body.price_override)
        .await?;
    Ok(Json(slot))
}

#[derive(Debug, Deserialize)]
struct SlotListQuery {
    date: Option<NaiveDate>,
}

async fn list_slots(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<SlotListQuery>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    Ok(Json(state.catalog.list_slots(id, query.date).await?))
}

async fn remove_slot(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.catalog.remove_time_slot(&ctx, id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
