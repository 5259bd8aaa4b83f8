use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::commands::seeding::FulfillOutcome;
use crate::entities::tray_request;
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct FarmParams {
    pub farm_id: Uuid,
}

pub async fn list_pending_requests(
    State(state): State<AppState>,
    Query(params): Query<FarmParams>,
) -> ApiResult<Vec<tray_request::Model>> {
    let requests = state
        .services
        .seeding
        .list_pending_requests(params.farm_id)
        .await?;
    Ok(Json(ApiResponse::success(requests)))
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateTrayRequestBody {
    pub farm_id: Uuid,
    pub recipe_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub sow_date: NaiveDate,
}

pub async fn create_tray_request(
    State(state): State<AppState>,
    Json(body): Json<CreateTrayRequestBody>,
) -> ApiResult<tray_request::Model> {
    body.validate()?;
    let request = state
        .services
        .seeding
        .request_trays(body.farm_id, body.recipe_id, body.quantity, body.sow_date)
        .await?;
    Ok(Json(ApiResponse::success(request)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelRequestBody {
    pub farm_id: Uuid,
}

pub async fn cancel_tray_request(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(body): Json<CancelRequestBody>,
) -> ApiResult<tray_request::Model> {
    let request = state
        .services
        .seeding
        .cancel_request(body.farm_id, request_id)
        .await?;
    Ok(Json(ApiResponse::success(request)))
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct FulfillSeedTaskBody {
    pub farm_id: Uuid,
    pub recipe_id: Uuid,
    pub task_date: NaiveDate,
    #[validate(range(min = 1))]
    pub quantity: i32,
    /// The operator's chosen batch; required
    pub batch_id: Option<Uuid>,
}

pub async fn fulfill_seed_task(
    State(state): State<AppState>,
    Json(body): Json<FulfillSeedTaskBody>,
) -> ApiResult<FulfillOutcome> {
    body.validate()?;
    let outcome = state
        .services
        .seeding
        .fulfill_seed_task(
            body.farm_id,
            body.recipe_id,
            body.task_date,
            body.quantity,
            body.batch_id,
        )
        .await?;
    Ok(Json(ApiResponse::success(outcome)))
}
