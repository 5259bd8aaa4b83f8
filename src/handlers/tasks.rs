use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::task_completion::{CompletionStatus, TaskType};
use crate::scheduling::tasks::TaskItem;
use crate::services::tasks::WeeklyTasks;
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct DatedFarmParams {
    pub farm_id: Uuid,
    pub date: NaiveDate,
}

pub async fn daily_tasks(
    State(state): State<AppState>,
    Query(params): Query<DatedFarmParams>,
) -> ApiResult<Vec<TaskItem>> {
    let tasks = state
        .services
        .tasks
        .daily_tasks(params.farm_id, params.date)
        .await?;
    Ok(Json(ApiResponse::success(tasks)))
}

/// Weekly view; `date` may be any day of the wanted week, the window is
/// normalized to its Monday.
pub async fn weekly_tasks(
    State(state): State<AppState>,
    Query(params): Query<DatedFarmParams>,
) -> ApiResult<WeeklyTasks> {
    let tasks = state
        .services
        .tasks
        .weekly_tasks(params.farm_id, params.date)
        .await?;
    Ok(Json(ApiResponse::success(tasks)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetTaskStatusBody {
    pub farm_id: Uuid,
    pub task_type: TaskType,
    pub task_date: NaiveDate,
    pub recipe_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub product_name: Option<String>,
    /// Omit to reset the task to pending
    pub status: Option<CompletionStatus>,
    pub quantity: Option<i32>,
}

pub async fn set_task_status(
    State(state): State<AppState>,
    Json(body): Json<SetTaskStatusBody>,
) -> ApiResult<()> {
    state
        .services
        .tasks
        .set_task_status(
            body.farm_id,
            body.task_type,
            body.task_date,
            body.recipe_id,
            body.customer_id,
            body.product_name,
            body.status,
            body.quantity,
        )
        .await?;
    Ok(Json(ApiResponse::success(())))
}
