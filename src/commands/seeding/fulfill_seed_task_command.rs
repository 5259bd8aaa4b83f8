use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::commands::tasks::upsert_completion;
use crate::commands::Command;
use crate::db::DbPool;
use crate::entities::task_completion::{self, CompletionStatus, TaskType};
use crate::entities::{seed_batch, tray_request, variety};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

use super::{resolve_farm_recipe, snapshot_steps};

/// Completion of a generated "Sow trays" task with an operator-chosen seed
/// batch.
///
/// Creates one tray request per tray, each stamped with the batch and the
/// task's date (not the completion wall-clock time, so back-dated and
/// future-dated seeding records accurately), then marks the task completed
/// in the ledger. The whole sequence runs in one transaction: a failed
/// template copy or request insert leaves nothing behind.
///
/// Inventory is never decremented here; the persistence boundary does that
/// when it converts fulfilled requests into trays.
#[derive(Debug, Serialize, Deserialize)]
pub struct FulfillSeedTaskCommand {
    pub farm_id: Uuid,
    pub recipe_id: Uuid,
    pub task_date: NaiveDate,
    pub quantity: i32,
    /// The operator's batch choice. Required; fulfillment without a batch is
    /// rejected before any row is written.
    pub batch_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FulfillOutcome {
    pub request_ids: Vec<Uuid>,
    /// The farm-owned recipe the requests reference (a fresh copy when the
    /// task pointed at a global template)
    pub recipe_id: Uuid,
    pub copied_from_template: Option<Uuid>,
}

#[async_trait]
impl Command for FulfillSeedTaskCommand {
    type Result = FulfillOutcome;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        if self.quantity < 1 {
            return Err(ServiceError::ValidationError(
                "Quantity must be at least 1".to_string(),
            ));
        }
        let batch_id = self.batch_id.ok_or_else(|| {
            ServiceError::ValidationError(
                "A seed batch must be selected to fulfill a seed task".to_string(),
            )
        })?;

        let txn = db_pool.begin().await?;
        let outcome = match self.fulfill(&txn, batch_id).await {
            Ok(outcome) => {
                txn.commit().await?;
                outcome
            }
            Err(err) => {
                txn.rollback().await?;
                return Err(err);
            }
        };

        if let Some(template_id) = outcome.copied_from_template {
            event_sender
                .send(Event::RecipeCopiedFromTemplate {
                    template_id,
                    farm_recipe_id: outcome.recipe_id,
                })
                .await
                .map_err(ServiceError::EventError)?;
        }
        event_sender
            .send(Event::SeedTaskFulfilled {
                recipe_id: outcome.recipe_id,
                batch_id,
                quantity: self.quantity,
                sow_date: self.task_date,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(
            recipe_id = %outcome.recipe_id,
            quantity = self.quantity,
            sow_date = %self.task_date,
            "seed task fulfilled"
        );
        Ok(outcome)
    }
}

impl FulfillSeedTaskCommand {
    async fn fulfill(
        &self,
        txn: &DatabaseTransaction,
        batch_id: Uuid,
    ) -> Result<FulfillOutcome, ServiceError> {
        // The ledger is checked first: the same logical task is re-derived
        // on every load, and a second fulfillment must be rejected, not
        // re-applied.
        let existing = task_completion::Entity::find()
            .filter(task_completion::Column::FarmId.eq(self.farm_id))
            .filter(task_completion::Column::TaskType.eq(TaskType::Seed))
            .filter(task_completion::Column::TaskDate.eq(self.task_date))
            .filter(task_completion::Column::RecipeId.eq(self.recipe_id))
            .filter(task_completion::Column::CustomerId.eq(Uuid::nil()))
            .filter(task_completion::Column::ProductName.eq(""))
            .one(txn)
            .await?;
        if matches!(
            existing,
            Some(ref row) if row.status == CompletionStatus::Completed
        ) {
            return Err(ServiceError::Conflict(format!(
                "Seed task for {} on {} is already fulfilled",
                self.recipe_id, self.task_date
            )));
        }

        let farm_recipe = resolve_farm_recipe(txn, self.farm_id, self.recipe_id).await?;

        let variety_id = farm_recipe.recipe.variety_id.ok_or_else(|| {
            ServiceError::MissingConfiguration(format!(
                "Recipe '{}' has no variety linked",
                farm_recipe.recipe.name
            ))
        })?;
        let variety = variety::Entity::find_by_id(variety_id)
            .one(txn)
            .await?
            .ok_or_else(|| {
                ServiceError::MissingConfiguration(format!(
                    "Variety {} referenced by recipe '{}' does not exist",
                    variety_id, farm_recipe.recipe.name
                ))
            })?;
        let grams_per_tray = variety.seed_grams_per_tray().ok_or_else(|| {
            ServiceError::MissingConfiguration(format!(
                "Variety '{}' has no seed-per-tray requirement recorded",
                variety.name
            ))
        })?;

        // Re-validate the operator's batch choice; its remaining quantity is
        // a best-effort snapshot that may have gone stale since matching.
        let batch = seed_batch::Entity::find_by_id(batch_id)
            .one(txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Seed batch {} not found", batch_id)))?;
        if batch.farm_id != self.farm_id {
            return Err(ServiceError::NotFound(format!(
                "Seed batch {} not found",
                batch_id
            )));
        }
        if batch.variety_id != variety.id {
            return Err(ServiceError::ValidationError(format!(
                "Seed batch '{}' holds a different variety than recipe '{}'",
                batch.lot_code, farm_recipe.recipe.name
            )));
        }
        let required = grams_per_tray * Decimal::from(self.quantity);
        if !batch.can_cover(required) {
            return Err(ServiceError::InsufficientSeed {
                required_grams: required,
                best_available_grams: batch.remaining_grams,
            });
        }

        // One request per tray, dated to the task, stamped with the batch.
        let steps_snapshot = snapshot_steps(&farm_recipe.steps);
        let now = Utc::now();
        let mut request_ids = Vec::with_capacity(self.quantity as usize);
        for _ in 0..self.quantity {
            let request = tray_request::ActiveModel {
                id: Set(Uuid::new_v4()),
                farm_id: Set(self.farm_id),
                recipe_id: Set(farm_recipe.recipe.id),
                recipe_name: Set(farm_recipe.recipe.name.clone()),
                variety_name: Set(Some(variety.name.clone())),
                steps_snapshot: Set(steps_snapshot.clone()),
                quantity: Set(1),
                sow_date: Set(self.task_date),
                batch_id: Set(Some(batch.id)),
                status: Set(tray_request::TrayRequestStatus::Pending),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(txn)
            .await?;
            request_ids.push(request.id);
        }

        upsert_completion(
            txn,
            self.farm_id,
            TaskType::Seed,
            self.task_date,
            self.recipe_id,
            Uuid::nil(),
            String::new(),
            CompletionStatus::Completed,
            Some(self.quantity),
        )
        .await?;

        Ok(FulfillOutcome {
            request_ids,
            recipe_id: farm_recipe.recipe.id,
            copied_from_template: farm_recipe.copied_from,
        })
    }
}
