use async_trait::async_trait;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::entities::{recipe, recipe_step, variety};
use crate::errors::ServiceError;
use crate::scheduling::planting::RecipePlan;

use super::Query;

/// Farm-owned recipes plus the shared template library.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListRecipesQuery {
    pub farm_id: Uuid,
    pub include_templates: bool,
}

#[async_trait]
impl Query for ListRecipesQuery {
    type Result = Vec<recipe::Model>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let mut condition = Condition::any().add(recipe::Column::FarmId.eq(self.farm_id));
        if self.include_templates {
            condition = condition.add(recipe::Column::FarmId.is_null());
        }
        Ok(recipe::Entity::find()
            .filter(condition)
            .order_by_asc(recipe::Column::Name)
            .all(db)
            .await?)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetRecipeWithStepsQuery {
    pub recipe_id: Uuid,
}

#[async_trait]
impl Query for GetRecipeWithStepsQuery {
    type Result = (recipe::Model, Vec<recipe_step::Model>);

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let recipe = recipe::Entity::find_by_id(self.recipe_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Recipe {} not found", self.recipe_id))
            })?;
        let steps = recipe_step::Entity::find()
            .filter(recipe_step::Column::RecipeId.eq(self.recipe_id))
            .order_by_asc(recipe_step::Column::Sequence)
            .all(db)
            .await?;
        Ok((recipe, steps))
    }
}

/// Loads every recipe visible to a farm as a `RecipePlan` (steps ordered,
/// variety attached), keyed by recipe id — the scheduler's working set.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoadRecipePlansQuery {
    pub farm_id: Uuid,
}

#[async_trait]
impl Query for LoadRecipePlansQuery {
    type Result = HashMap<Uuid, RecipePlan>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let recipes = recipe::Entity::find()
            .filter(
                Condition::any()
                    .add(recipe::Column::FarmId.eq(self.farm_id))
                    .add(recipe::Column::FarmId.is_null()),
            )
            .all(db)
            .await?;

        let recipe_ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
        let mut steps_by_recipe: HashMap<Uuid, Vec<recipe_step::Model>> = HashMap::new();
        for step in recipe_step::Entity::find()
            .filter(recipe_step::Column::RecipeId.is_in(recipe_ids))
            .order_by_asc(recipe_step::Column::Sequence)
            .all(db)
            .await?
        {
            steps_by_recipe.entry(step.recipe_id).or_default().push(step);
        }

        let variety_ids: Vec<Uuid> = recipes.iter().filter_map(|r| r.variety_id).collect();
        let varieties: HashMap<Uuid, variety::Model> = variety::Entity::find()
            .filter(variety::Column::Id.is_in(variety_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        Ok(recipes
            .into_iter()
            .map(|recipe| {
                let steps = steps_by_recipe.remove(&recipe.id).unwrap_or_default();
                let variety = recipe.variety_id.and_then(|id| varieties.get(&id).cloned());
                (
                    recipe.id,
                    RecipePlan {
                        recipe,
                        steps,
                        variety,
                    },
                )
            })
            .collect())
    }
}
