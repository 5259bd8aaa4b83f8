use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::entities::seed_batch;
use crate::services::seed_batches::BatchMatch;
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct FarmParams {
    pub farm_id: Uuid,
}

pub async fn list_batches(
    State(state): State<AppState>,
    Query(params): Query<FarmParams>,
) -> ApiResult<Vec<seed_batch::Model>> {
    let batches = state
        .services
        .seed_batches
        .list_batches(params.farm_id)
        .await?;
    Ok(Json(ApiResponse::success(batches)))
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateBatchRequest {
    pub farm_id: Uuid,
    pub variety_id: Uuid,
    #[validate(length(min = 1))]
    pub lot_code: String,
    pub remaining_grams: Decimal,
    pub purchase_date: NaiveDate,
}

pub async fn create_batch(
    State(state): State<AppState>,
    Json(body): Json<CreateBatchRequest>,
) -> ApiResult<seed_batch::Model> {
    body.validate()?;
    let batch = state
        .services
        .seed_batches
        .create_batch(
            body.farm_id,
            body.variety_id,
            body.lot_code,
            body.remaining_grams,
            body.purchase_date,
        )
        .await?;
    Ok(Json(ApiResponse::success(batch)))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MatchBatchesParams {
    pub farm_id: Uuid,
    pub recipe_id: Uuid,
}

/// Enumerate the batches able to seed one tray of the recipe's variety.
/// Which one to allocate stays the operator's choice.
pub async fn match_batches(
    State(state): State<AppState>,
    Query(params): Query<MatchBatchesParams>,
) -> ApiResult<BatchMatch> {
    let matched = state
        .services
        .seed_batches
        .match_batches(params.farm_id, params.recipe_id)
        .await?;
    Ok(Json(ApiResponse::success(matched)))
}
