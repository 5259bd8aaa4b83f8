use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::commands::Command;
use crate::db::DbPool;
use crate::entities::tray::{self, TrayStatus};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

use super::load_tray;

/// Marks a tray lost. Terminal: lifecycle resolution short-circuits to Lost
/// from here on, and further mutations are rejected.
#[derive(Debug, Serialize, Deserialize)]
pub struct MarkTrayLostCommand {
    pub farm_id: Uuid,
    pub tray_id: Uuid,
    pub reason: Option<String>,
}

#[async_trait]
impl Command for MarkTrayLostCommand {
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
            return Err(ServiceError::Conflict(format!(
                "Tray {} is already marked lost",
                self.tray_id
            )));
        }

        let mut active = tray.into_active_model();
        active.status = Set(TrayStatus::Lost);
        active.loss_reason = Set(self.reason.clone());
        active.updated_at = Set(Utc::now());
        let updated = active.update(db).await?;

        warn!(tray_id = %self.tray_id, reason = ?self.reason, "tray marked lost");
        event_sender
            .send(Event::TrayLost {
                tray_id: self.tray_id,
                reason: self.reason.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
