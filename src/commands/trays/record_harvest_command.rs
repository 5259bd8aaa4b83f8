use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::commands::Command;
use crate::db::DbPool;
use crate::entities::tray;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

use super::load_tray;

/// Records a tray's harvest date and yield. The harvest date is what makes
/// lifecycle resolution report Harvested.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordHarvestCommand {
    pub farm_id: Uuid,
    pub tray_id: Uuid,
    pub harvest_date: NaiveDate,
    pub yield_grams: Option<Decimal>,
}

#[async_trait]
impl Command for RecordHarvestCommand {
    type Result = tray::Model;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let db = db_pool.as_ref();

        let tray = load_tray(db, self.farm_id, self.tray_id).await?;
        if tray.is_lost() {
            return Err(ServiceError::InvalidOperation(format!(
                "Tray {} is lost and cannot be harvested",
                self.tray_id
            )));
        }
        if tray.harvest_date.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Tray {} is already harvested",
                self.tray_id
            )));
        }

        let mut active = tray.into_active_model();
        active.harvest_date = Set(Some(self.harvest_date));
        active.yield_grams = Set(self.yield_grams);
        active.updated_at = Set(Utc::now());
        let updated = active.update(db).await?;

        info!(
            tray_id = %self.tray_id,
            harvest_date = %self.harvest_date,
            "tray harvested"
        );
        event_sender
            .send(Event::TrayHarvested {
                tray_id: self.tray_id,
                harvest_date: self.harvest_date,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
