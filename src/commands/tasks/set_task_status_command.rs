use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::commands::Command;
use crate::db::DbPool;
use crate::entities::task_completion::{self, CompletionStatus, TaskType};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

use super::upsert_completion;

/// Sets a generated task's status by upserting or deleting its ledger row.
///
/// `status: None` means back-to-pending: the ledger row is deleted, and the
/// next recomputation derives the task fresh. Any other status upserts on
/// the composite key, so marking the same task twice is a no-op rather than
/// a duplicate.
#[derive(Debug, Serialize, Deserialize)]
pub struct SetTaskStatusCommand {
    pub farm_id: Uuid,
    pub task_type: TaskType,
    pub task_date: NaiveDate,
    pub recipe_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub product_name: Option<String>,
    /// None resets the task to pending
    pub status: Option<CompletionStatus>,
    pub quantity: Option<i32>,
}

#[async_trait]
impl Command for SetTaskStatusCommand {
    type Result = ();

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let db = db_pool.as_ref();
        let recipe_key = self.recipe_id.unwrap_or_else(Uuid::nil);
        let customer_key = self.customer_id.unwrap_or_else(Uuid::nil);
        let product_key = self.product_name.clone().unwrap_or_default();

        match self.status {
            Some(status) => {
                upsert_completion(
                    db,
                    self.farm_id,
                    self.task_type,
                    self.task_date,
                    recipe_key,
                    customer_key,
                    product_key,
                    status,
                    self.quantity,
                )
                .await?;
            }
            None => {
                task_completion::Entity::delete_many()
                    .filter(task_completion::Column::FarmId.eq(self.farm_id))
                    .filter(task_completion::Column::TaskType.eq(self.task_type))
                    .filter(task_completion::Column::TaskDate.eq(self.task_date))
                    .filter(task_completion::Column::RecipeId.eq(recipe_key))
                    .filter(task_completion::Column::CustomerId.eq(customer_key))
                    .filter(task_completion::Column::ProductName.eq(product_key))
                    .exec(db)
                    .await?;
            }
        }

        let status_label = self
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "pending".to_string());
        info!(
            task_type = %self.task_type,
            task_date = %self.task_date,
            status = %status_label,
            "task status updated"
        );
        event_sender
            .send(Event::TaskStatusChanged {
                task_type: self.task_type,
                task_date: self.task_date,
                recipe_id: self.recipe_id,
                status: status_label,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(())
    }
}
