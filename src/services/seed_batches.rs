use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::Serialize;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::{recipe, seed_batch, variety};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::queries::batch_queries::{ListBatchesForVarietyQuery, ListFarmBatchesQuery};
use crate::queries::Query;

/// Seed inventory reads plus the batch matcher.
#[derive(Clone)]
pub struct SeedBatchService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

/// Matcher output: every batch that can cover the requirement, in
/// earliest-purchase order. Selection among them is the operator's call —
/// the matcher deliberately does not auto-pick.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchMatch {
    pub variety_id: Uuid,
    pub variety_name: String,
    /// Per-tray requirement normalized to grams
    pub required_grams: Decimal,
    #[schema(value_type = Vec<Object>)]
    pub candidates: Vec<seed_batch::Model>,
}

impl SeedBatchService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list_batches(
        &self,
        farm_id: Uuid,
    ) -> Result<Vec<seed_batch::Model>, ServiceError> {
        ListFarmBatchesQuery { farm_id }.execute(&self.db).await
    }

    #[instrument(skip(self))]
    pub async fn create_batch(
        &self,
        farm_id: Uuid,
        variety_id: Uuid,
        lot_code: String,
        remaining_grams: Decimal,
        purchase_date: NaiveDate,
    ) -> Result<seed_batch::Model, ServiceError> {
        if remaining_grams < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Batch quantity cannot be negative".to_string(),
            ));
        }
        variety::Entity::find_by_id(variety_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Variety {} not found", variety_id))
            })?;

        let now = Utc::now();
        let batch = seed_batch::ActiveModel {
            id: Set(Uuid::new_v4()),
            farm_id: Set(farm_id),
            variety_id: Set(variety_id),
            lot_code: Set(lot_code),
            remaining_grams: Set(remaining_grams),
            purchase_date: Set(purchase_date),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await?;

        info!(batch_id = %batch.id, grams = %batch.remaining_grams, "seed batch created");
        self.event_sender
            .send(Event::SeedBatchCreated(batch.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(batch)
    }

    /// Finds every batch able to seed one tray of the given recipe's
    /// variety.
    ///
    /// Fails with `MissingConfiguration` when the recipe has no variety or
    /// the variety no recorded seed mass — master-data problems, to be fixed
    /// in settings — and with `InsufficientSeed` (naming the largest batch
    /// on hand and the requirement) when stock simply does not cover it.
    #[instrument(skip(self))]
    pub async fn match_batches(
        &self,
        farm_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<BatchMatch, ServiceError> {
        let recipe = recipe::Entity::find_by_id(recipe_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Recipe {} not found", recipe_id)))?;

        let variety_id = recipe.variety_id.ok_or_else(|| {
            ServiceError::MissingConfiguration(format!(
                "Recipe '{}' has no variety linked",
                recipe.name
            ))
        })?;
        let variety = variety::Entity::find_by_id(variety_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| {
                ServiceError::MissingConfiguration(format!(
                    "Variety {} referenced by recipe '{}' does not exist",
                    variety_id, recipe.name
                ))
            })?;
        let required_grams = variety.seed_grams_per_tray().ok_or_else(|| {
            ServiceError::MissingConfiguration(format!(
                "Variety '{}' has no seed-per-tray requirement recorded",
                variety.name
            ))
        })?;

        let batches = ListBatchesForVarietyQuery {
            farm_id,
            variety_id,
        }
        .execute(&self.db)
        .await?;

        let candidates: Vec<seed_batch::Model> = batches
            .iter()
            .filter(|b| b.can_cover(required_grams))
            .cloned()
            .collect();

        if candidates.is_empty() {
            let best_available_grams = batches
                .iter()
                .map(|b| b.remaining_grams)
                .max()
                .unwrap_or(Decimal::ZERO);
            return Err(ServiceError::InsufficientSeed {
                required_grams,
                best_available_grams,
            });
        }

        Ok(BatchMatch {
            variety_id,
            variety_name: variety.name,
            required_grams,
            candidates,
        })
    }
}
