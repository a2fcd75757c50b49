use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use pitchbase_core::{AuthContext, CoreResult};
use pitchbase_reporting::{CustomerRollup, DateRange};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/reports/revenue", get(revenue))
        .route("/v1/reports/occupancy/{turf_id}", get(occupancy))
        .route("/v1/reports/customers", get(customers))
}

#[derive(Debug, Deserialize)]
struct RangeQuery {
    from: chrono::NaiveDate,
    to: chrono::NaiveDate,
    /// Admins may report on any owner; owners only on themselves.
    owner_id: Option<String>,
}

fn resolve_owner(ctx: &AuthContext, requested: Option<String>) -> CoreResult<String> {
    match requested {
        Some(owner_id) if owner_id != ctx.user_id => {
            ctx.require_admin("reports for other owners")?;
            Ok(owner_id)
        }
        _ => Ok(ctx.user_id.clone()),
    }
}

#[derive(Debug, Serialize)]
struct RevenueResponse {
    owner_id: String,
    from: chrono::NaiveDate,
    to: chrono::NaiveDate,
    total_revenue: i64,
}

async fn revenue(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<RevenueResponse>, AppError> {
    let owner_id = resolve_owner(&ctx, query.owner_id)?;
    let range = DateRange {
        from: query.from,
        to: query.to,
    };
    let total_revenue = state.reports.revenue_for_owner(&owner_id, range).await?;
    Ok(Json(RevenueResponse {
        owner_id,
        from: query.from,
        to: query.to,
        total_revenue,
    }))
}

#[derive(Debug, Serialize)]
struct OccupancyResponse {
    turf_id: Uuid,
    from: chrono::NaiveDate,
    to: chrono::NaiveDate,
    occupancy: f64,
}

async fn occupancy(
    State(state): State<AppState>,
    Path(turf_id): Path<Uuid>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<OccupancyResponse>, AppError> {
    let range = DateRange {
        from: query.from,
        to: query.to,
    };
    let occupancy = state.reports.occupancy_for_turf(turf_id, range).await?;
    Ok(Json(OccupancyResponse {
        turf_id,
        from: query.from,
        to: query.to,
        occupancy,
    }))
}

#[derive(Debug, Deserialize)]
struct CustomerQuery {
    owner_id: Option<String>,
}

async fn customers(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<CustomerQuery>,
) -> Result<Json<Vec<CustomerRollup>>, AppError> {
    let owner_id = resolve_owner(&ctx, query.owner_id)?;
    Ok(Json(state.reports.customer_rollup(&owner_id).await?))
}
