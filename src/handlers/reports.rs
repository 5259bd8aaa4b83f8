use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::reports::SeedingPlan;
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct SeedingPlanParams {
    pub farm_id: Uuid,
    /// Sow date the plan is printed for
    pub date: NaiveDate,
}

pub async fn seeding_plan(
    State(state): State<AppState>,
    Query(params): Query<SeedingPlanParams>,
) -> ApiResult<SeedingPlan> {
    let plan = state
        .services
        .reports
        .seeding_plan(params.farm_id, params.date)
        .await?;
    Ok(Json(ApiResponse::success(plan)))
}
