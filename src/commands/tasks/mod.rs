pub mod set_task_status_command;

pub use set_task_status_command::SetTaskStatusCommand;

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, EntityTrait, Set};
use uuid::Uuid;

use crate::entities::task_completion::{self, CompletionStatus, TaskType};
use crate::errors::ServiceError;

/// Atomic upsert of a ledger row on its composite key. The unique index is
/// the deduplication boundary; concurrent or repeated writes of the same
/// logical task collapse into one row instead of racing a check-then-insert.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn upsert_completion<C: ConnectionTrait>(
    db: &C,
    farm_id: Uuid,
    task_type: TaskType,
    task_date: NaiveDate,
    recipe_id: Uuid,
    customer_id: Uuid,
    product_name: String,
    status: CompletionStatus,
    quantity: Option<i32>,
) -> Result<(), ServiceError> {
    let row = task_completion::ActiveModel {
        id: Set(Uuid::new_v4()),
        farm_id: Set(farm_id),
        task_type: Set(task_type),
        task_date: Set(task_date),
        recipe_id: Set(recipe_id),
        customer_id: Set(customer_id),
        product_name: Set(product_name),
        status: Set(status),
        quantity: Set(quantity),
        completed_at: Set(Utc::now()),
    };

    task_completion::Entity::insert(row)
        .on_conflict(
            OnConflict::columns([
                task_completion::Column::FarmId,
                task_completion::Column::TaskType,
                task_completion::Column::TaskDate,
                task_completion::Column::RecipeId,
                task_completion::Column::CustomerId,
                task_completion::Column::ProductName,
            ])
            .update_columns([
                task_completion::Column::Status,
                task_completion::Column::Quantity,
                task_completion::Column::CompletedAt,
            ])
            .to_owned(),
        )
        .exec(db)
        .await?;

    Ok(())
}
