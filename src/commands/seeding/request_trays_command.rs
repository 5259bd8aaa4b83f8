use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::commands::Command;
use crate::db::DbPool;
use crate::entities::{tray_request, variety};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

use super::{resolve_farm_recipe, snapshot_steps};

/// Operator intent: seed `quantity` trays of a recipe on a given date.
///
/// Writes one pending tray request carrying a durable snapshot of the recipe
/// and variety names plus the step list, so later recipe edits cannot
/// corrupt what was asked for. Inventory is untouched; batch allocation
/// happens at fulfillment.
#[derive(Debug, Serialize, Deserialize)]
pub struct RequestTraysCommand {
    pub farm_id: Uuid,
    pub recipe_id: Uuid,
    pub quantity: i32,
    pub sow_date: NaiveDate,
}

#[async_trait]
impl Command for RequestTraysCommand {
    type Result = tray_request::Model;

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

        let txn = db_pool.begin().await?;
        let request = match self.create_request(&txn).await {
            Ok(request) => {
                txn.commit().await?;
                request
            }
            Err(err) => {
                txn.rollback().await?;
                return Err(err);
            }
        };

        info!(
            request_id = %request.id,
            recipe = %request.recipe_name,
            quantity = request.quantity,
            "tray request created"
        );
        event_sender
            .send(Event::TrayRequestCreated {
                request_id: request.id,
                recipe_id: request.recipe_id,
                quantity: request.quantity,
                sow_date: request.sow_date,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(request)
    }
}

impl RequestTraysCommand {
    async fn create_request(
        &self,
        txn: &DatabaseTransaction,
    ) -> Result<tray_request::Model, ServiceError> {
        let farm_recipe = resolve_farm_recipe(txn, self.farm_id, self.recipe_id).await?;

        let variety_name = match farm_recipe.recipe.variety_id {
            Some(variety_id) => variety::Entity::find_by_id(variety_id)
                .one(txn)
                .await?
                .map(|v| v.name),
            None => None,
        };

        let now = Utc::now();
        let request = tray_request::ActiveModel {
            id: Set(Uuid::new_v4()),
            farm_id: Set(self.farm_id),
            recipe_id: Set(farm_recipe.recipe.id),
            recipe_name: Set(farm_recipe.recipe.name.clone()),
            variety_name: Set(variety_name),
            steps_snapshot: Set(snapshot_steps(&farm_recipe.steps)),
            quantity: Set(self.quantity),
            sow_date: Set(self.sow_date),
            batch_id: Set(None),
            status: Set(tray_request::TrayRequestStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await?;

        Ok(request)
    }
}
