use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::entities::{customer, variety};
use crate::services::customers::StandingOrderDetail;
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct FarmParams {
    pub farm_id: Uuid,
}

pub async fn list_customers(
    State(state): State<AppState>,
    Query(params): Query<FarmParams>,
) -> ApiResult<Vec<customer::Model>> {
    let customers = state
        .services
        .customers
        .list_customers(params.farm_id)
        .await?;
    Ok(Json(ApiResponse::success(customers)))
}

pub async fn list_varieties(State(state): State<AppState>) -> ApiResult<Vec<variety::Model>> {
    let varieties = state.services.customers.list_varieties().await?;
    Ok(Json(ApiResponse::success(varieties)))
}

pub async fn list_standing_orders(
    State(state): State<AppState>,
    Query(params): Query<FarmParams>,
) -> ApiResult<Vec<StandingOrderDetail>> {
    let orders = state
        .services
        .customers
        .list_standing_orders(params.farm_id)
        .await?;
    Ok(Json(ApiResponse::success(orders)))
}
