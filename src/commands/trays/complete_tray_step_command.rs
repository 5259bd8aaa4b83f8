use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::commands::Command;
use crate::db::DbPool;
use crate::entities::tray_step::{self, TrayStepStatus};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

use super::load_tray;

/// Marks one pending tray step completed or skipped, stamping the time.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteTrayStepCommand {
    pub farm_id: Uuid,
    pub tray_id: Uuid,
    pub step_id: Uuid,
    pub skip: bool,
}

#[async_trait]
impl Command for CompleteTrayStepCommand {
    type Result = tray_step::Model;

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
                "Tray {} is lost; its steps can no longer be worked",
                self.tray_id
            )));
        }

        let step = tray_step::Entity::find_by_id(self.step_id)
            .one(db)
            .await?
            .filter(|s| s.tray_id == self.tray_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Step {} not found on tray {}",
                    self.step_id, self.tray_id
                ))
            })?;
        if !step.is_pending() {
            return Err(ServiceError::Conflict(format!(
                "Step '{}' is already {:?}",
                step.step_description, step.status
            )));
        }

        let mut active = step.into_active_model();
        active.status = Set(if self.skip {
            TrayStepStatus::Skipped
        } else {
            TrayStepStatus::Completed
        });
        active.completed_at = Set(Some(Utc::now()));
        let updated = active.update(db).await?;

        info!(
            tray_id = %self.tray_id,
            step = %updated.step_description,
            skipped = self.skip,
            "tray step resolved"
        );
        event_sender
            .send(Event::TrayStepCompleted {
                tray_id: self.tray_id,
                step_id: self.step_id,
                skipped: self.skip,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
