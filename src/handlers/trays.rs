use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::{tray, tray_step};
use crate::services::trays::TrayDetail;
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct FarmParams {
    pub farm_id: Uuid,
}

pub async fn list_trays(
    State(state): State<AppState>,
    Query(params): Query<FarmParams>,
) -> ApiResult<Vec<TrayDetail>> {
    let trays = state.services.trays.list_trays(params.farm_id).await?;
    Ok(Json(ApiResponse::success(trays)))
}

pub async fn get_tray(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<FarmParams>,
) -> ApiResult<TrayDetail> {
    let detail = state.services.trays.get_tray(params.farm_id, id).await?;
    Ok(Json(ApiResponse::success(detail)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CompleteStepRequest {
    pub farm_id: Uuid,
    /// Skip instead of complete
    #[serde(default)]
    pub skip: bool,
}

pub async fn complete_step(
    State(state): State<AppState>,
    Path((tray_id, step_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<CompleteStepRequest>,
) -> ApiResult<tray_step::Model> {
    let step = state
        .services
        .trays
        .complete_step(body.farm_id, tray_id, step_id, body.skip)
        .await?;
    Ok(Json(ApiResponse::success(step)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkLostRequest {
    pub farm_id: Uuid,
    pub reason: Option<String>,
}

pub async fn mark_lost(
    State(state): State<AppState>,
    Path(tray_id): Path<Uuid>,
    Json(body): Json<MarkLostRequest>,
) -> ApiResult<tray::Model> {
    let tray = state
        .services
        .trays
        .mark_lost(body.farm_id, tray_id, body.reason)
        .await?;
    Ok(Json(ApiResponse::success(tray)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordHarvestRequest {
    pub farm_id: Uuid,
    pub harvest_date: NaiveDate,
    pub yield_grams: Option<Decimal>,
}

pub async fn record_harvest(
    State(state): State<AppState>,
    Path(tray_id): Path<Uuid>,
    Json(body): Json<RecordHarvestRequest>,
) -> ApiResult<tray::Model> {
    let tray = state
        .services
        .trays
        .record_harvest(body.farm_id, tray_id, body.harvest_date, body.yield_grams)
        .await?;
    Ok(Json(ApiResponse::success(tray)))
}
