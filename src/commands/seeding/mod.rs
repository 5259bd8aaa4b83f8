pub mod cancel_tray_request_command;
pub mod fulfill_seed_task_command;
pub mod request_trays_command;

pub use cancel_tray_request_command::CancelTrayRequestCommand;
pub use fulfill_seed_task_command::{FulfillOutcome, FulfillSeedTaskCommand};
pub use request_trays_command::RequestTraysCommand;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::tray_request::StepSnapshot;
use crate::entities::{recipe, recipe_step};
use crate::errors::ServiceError;

/// A recipe resolved to something farm-owned, with its ordered steps.
pub(crate) struct FarmRecipe {
    pub recipe: recipe::Model,
    pub steps: Vec<recipe_step::Model>,
    /// Set when this call materialized the farm copy
    pub copied_from: Option<Uuid>,
}

/// Resolves a recipe for use by a farm, copying global templates on first
/// use. Farm-scoped reporting and edit history require farm ownership, so a
/// template is never referenced directly; the farm gets its own copy
/// (name, steps, scheduling metadata) exactly once, keyed by
/// `source_recipe_id`.
pub(crate) async fn resolve_farm_recipe(
    txn: &DatabaseTransaction,
    farm_id: Uuid,
    recipe_id: Uuid,
) -> Result<FarmRecipe, ServiceError> {
    let recipe = recipe::Entity::find_by_id(recipe_id)
        .one(txn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Recipe {} not found", recipe_id)))?;

    if !recipe.is_template() {
        if recipe.farm_id != Some(farm_id) {
            return Err(ServiceError::NotFound(format!(
                "Recipe {} not found",
                recipe_id
            )));
        }
        let steps = ordered_steps(txn, recipe.id).await?;
        return Ok(FarmRecipe {
            recipe,
            steps,
            copied_from: None,
        });
    }

    // Reuse the farm's existing copy of this template if one exists.
    if let Some(existing) = recipe::Entity::find()
        .filter(recipe::Column::FarmId.eq(farm_id))
        .filter(recipe::Column::SourceRecipeId.eq(recipe.id))
        .one(txn)
        .await?
    {
        let steps = ordered_steps(txn, existing.id).await?;
        return Ok(FarmRecipe {
            recipe: existing,
            steps,
            copied_from: None,
        });
    }

    let template_steps = ordered_steps(txn, recipe.id).await?;
    let now = Utc::now();
    let copy = recipe::ActiveModel {
        id: Set(Uuid::new_v4()),
        farm_id: Set(Some(farm_id)),
        source_recipe_id: Set(Some(recipe.id)),
        name: Set(recipe.name.clone()),
        variety_id: Set(recipe.variety_id),
        requires_soak: Set(recipe.requires_soak),
        soak_hours: Set(recipe.soak_hours),
        lead_time_days: Set(recipe.lead_time_days),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await?;

    let mut steps = Vec::with_capacity(template_steps.len());
    for step in &template_steps {
        let copied = recipe_step::ActiveModel {
            id: Set(Uuid::new_v4()),
            recipe_id: Set(copy.id),
            sequence: Set(step.sequence),
            description: Set(step.description.clone()),
            duration_value: Set(step.duration_value),
            duration_unit: Set(step.duration_unit),
        }
        .insert(txn)
        .await?;
        steps.push(copied);
    }

    Ok(FarmRecipe {
        recipe: copy,
        steps,
        copied_from: Some(recipe.id),
    })
}

pub(crate) async fn ordered_steps(
    txn: &DatabaseTransaction,
    recipe_id: Uuid,
) -> Result<Vec<recipe_step::Model>, ServiceError> {
    Ok(recipe_step::Entity::find()
        .filter(recipe_step::Column::RecipeId.eq(recipe_id))
        .order_by_asc(recipe_step::Column::Sequence)
        .all(txn)
        .await?)
}

/// Serializes the step list for the durable request snapshot.
pub(crate) fn snapshot_steps(steps: &[recipe_step::Model]) -> serde_json::Value {
    let snapshots: Vec<StepSnapshot> = steps
        .iter()
        .map(|s| StepSnapshot {
            sequence: s.sequence,
            description: s.description.clone(),
            duration_value: s.duration_value,
            duration_unit: match s.duration_unit {
                recipe_step::DurationUnit::Day => "day".to_string(),
                recipe_step::DurationUnit::Hour => "hour".to_string(),
            },
        })
        .collect();
    serde_json::to_value(snapshots).unwrap_or_else(|_| serde_json::Value::Array(Vec::new()))
}
