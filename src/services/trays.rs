use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::commands::trays::{
    CompleteTrayStepCommand, MarkTrayLostCommand, RecordHarvestCommand,
};
use crate::commands::Command;
use crate::db::DbPool;
use crate::entities::{tray, tray_step};
use crate::errors::ServiceError;
use crate::events::EventSender;
use crate::queries::recipe_queries::LoadRecipePlansQuery;
use crate::queries::tray_queries::{GetStepsForTraysQuery, ListTraysQuery};
use crate::queries::Query;
use crate::scheduling::lifecycle::{projected_harvest, resolve_lifecycle, TrayLifecycle};

/// A tray with its derived lifecycle state and harvest projection.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrayDetail {
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub tray: tray::Model,
    pub lifecycle: TrayLifecycle,
    pub projected_harvest: NaiveDate,
    #[schema(value_type = Vec<Object>)]
    pub steps: Vec<tray_step::Model>,
}

#[derive(Clone)]
pub struct TrayService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl TrayService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Lists a farm's trays with lifecycle resolved per tray. The stage is
    /// always computed here from the step rows, never read from a cache.
    #[instrument(skip(self))]
    pub async fn list_trays(&self, farm_id: Uuid) -> Result<Vec<TrayDetail>, ServiceError> {
        let trays = ListTraysQuery { farm_id }.execute(&self.db).await?;
        let steps_by_tray = GetStepsForTraysQuery {
            tray_ids: trays.iter().map(|t| t.id).collect(),
        }
        .execute(&self.db)
        .await?;
        let plans = LoadRecipePlansQuery { farm_id }.execute(&self.db).await?;

        Ok(trays
            .into_iter()
            .map(|t| {
                let steps = steps_by_tray.get(&t.id).cloned().unwrap_or_default();
                let grow = plans.get(&t.recipe_id).map(|p| p.grow_days()).unwrap_or(0);
                TrayDetail {
                    lifecycle: resolve_lifecycle(&t, &steps),
                    projected_harvest: projected_harvest(t.sow_date, grow),
                    tray: t,
                    steps,
                }
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get_tray(
        &self,
        farm_id: Uuid,
        tray_id: Uuid,
    ) -> Result<TrayDetail, ServiceError> {
        use sea_orm::EntityTrait;

        let tray = tray::Entity::find_by_id(tray_id)
            .one(self.db.as_ref())
            .await?
            .filter(|t| t.farm_id == farm_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Tray {} not found", tray_id)))?;

        let steps = GetStepsForTraysQuery {
            tray_ids: vec![tray.id],
        }
        .execute(&self.db)
        .await?
        .remove(&tray.id)
        .unwrap_or_default();

        let plans = LoadRecipePlansQuery { farm_id }.execute(&self.db).await?;
        let grow = plans
            .get(&tray.recipe_id)
            .map(|p| p.grow_days())
            .unwrap_or(0);

        Ok(TrayDetail {
            lifecycle: resolve_lifecycle(&tray, &steps),
            projected_harvest: projected_harvest(tray.sow_date, grow),
            tray,
            steps,
        })
    }

    #[instrument(skip(self))]
    pub async fn complete_step(
        &self,
        farm_id: Uuid,
        tray_id: Uuid,
        step_id: Uuid,
        skip: bool,
    ) -> Result<tray_step::Model, ServiceError> {
        CompleteTrayStepCommand {
            farm_id,
            tray_id,
            step_id,
            skip,
        }
        .execute(self.db.clone(), self.event_sender.clone())
        .await
    }

    #[instrument(skip(self))]
    pub async fn mark_lost(
        &self,
        farm_id: Uuid,
        tray_id: Uuid,
        reason: Option<String>,
    ) -> Result<tray::Model, ServiceError> {
        MarkTrayLostCommand {
            farm_id,
            tray_id,
            reason,
        }
        .execute(self.db.clone(), self.event_sender.clone())
        .await
    }

    #[instrument(skip(self))]
    pub async fn record_harvest(
        &self,
        farm_id: Uuid,
        tray_id: Uuid,
        harvest_date: NaiveDate,
        yield_grams: Option<Decimal>,
    ) -> Result<tray::Model, ServiceError> {
        RecordHarvestCommand {
            farm_id,
            tray_id,
            harvest_date,
            yield_grams,
        }
        .execute(self.db.clone(), self.event_sender.clone())
        .await
    }
}
