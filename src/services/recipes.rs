use std::collections::HashMap;
use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::{recipe, recipe_step};
use crate::errors::ServiceError;
use crate::queries::recipe_queries::{
    GetRecipeWithStepsQuery, ListRecipesQuery, LoadRecipePlansQuery,
};
use crate::queries::Query;
use crate::scheduling::planting::RecipePlan;
use crate::scheduling::{grow_days, lifecycle};

/// Read access to recipes and their derived grow times.
#[derive(Clone)]
pub struct RecipeService {
    db: Arc<DbPool>,
}

impl RecipeService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list_recipes(
        &self,
        farm_id: Uuid,
        include_templates: bool,
    ) -> Result<Vec<recipe::Model>, ServiceError> {
        ListRecipesQuery {
            farm_id,
            include_templates,
        }
        .execute(&self.db)
        .await
    }

    /// A recipe with its ordered steps and computed total grow days.
    #[instrument(skip(self))]
    pub async fn get_recipe_detail(
        &self,
        recipe_id: Uuid,
    ) -> Result<RecipeDetail, ServiceError> {
        let (recipe, steps) = GetRecipeWithStepsQuery { recipe_id }.execute(&self.db).await?;
        let total_grow_days = grow_days(&steps);
        Ok(RecipeDetail {
            recipe,
            steps,
            total_grow_days,
        })
    }

    /// Scheduler working set: every visible recipe as a `RecipePlan`.
    #[instrument(skip(self))]
    pub async fn load_plans(
        &self,
        farm_id: Uuid,
    ) -> Result<HashMap<Uuid, RecipePlan>, ServiceError> {
        LoadRecipePlansQuery { farm_id }.execute(&self.db).await
    }

    /// Projected harvest for a hypothetical sow date of a given recipe.
    #[instrument(skip(self))]
    pub async fn projected_harvest(
        &self,
        recipe_id: Uuid,
        sow_date: chrono::NaiveDate,
    ) -> Result<chrono::NaiveDate, ServiceError> {
        let (_, steps) = GetRecipeWithStepsQuery { recipe_id }.execute(&self.db).await?;
        Ok(lifecycle::projected_harvest(sow_date, grow_days(&steps)))
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct RecipeDetail {
    pub recipe: recipe::Model,
    pub steps: Vec<recipe_step::Model>,
    pub total_grow_days: i64,
}
