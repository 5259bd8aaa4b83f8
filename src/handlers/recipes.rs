use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::entities::recipe;
use crate::services::recipes::RecipeDetail;
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    pub farm_id: Uuid,
    /// Include the shared template library
    #[serde(default)]
    pub include_templates: bool,
}

pub async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<ListRecipesParams>,
) -> ApiResult<Vec<recipe::Model>> {
    let recipes = state
        .services
        .recipes
        .list_recipes(params.farm_id, params.include_templates)
        .await?;
    Ok(Json(ApiResponse::success(recipes)))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<RecipeDetail> {
    let detail = state.services.recipes.get_recipe_detail(id).await?;
    Ok(Json(ApiResponse::success(detail)))
}
