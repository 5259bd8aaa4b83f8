use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::commands::Command;
use crate::db::DbPool;
use crate::entities::tray_request::{self, TrayRequestStatus};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Cancels a pending tray request. A status update only: trays already
/// created from a fulfilled request are not rolled back.
#[derive(Debug, Serialize, Deserialize)]
pub struct CancelTrayRequestCommand {
    pub farm_id: Uuid,
    pub request_id: Uuid,
}

#[async_trait]
impl Command for CancelTrayRequestCommand {
    type Result = tray_request::Model;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let db = db_pool.as_ref();

        let request = tray_request::Entity::find_by_id(self.request_id)
            .one(db)
            .await?
            .filter(|r| r.farm_id == self.farm_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Tray request {} not found", self.request_id))
            })?;

        if request.status != TrayRequestStatus::Pending {
            return Err(ServiceError::Conflict(format!(
                "Tray request {} is already {:?}",
                self.request_id, request.status
            )));
        }

        let mut active = request.into_active_model();
        active.status = Set(TrayRequestStatus::Cancelled);
        active.updated_at = Set(Utc::now());
        let updated = active.update(db).await?;

        info!(request_id = %self.request_id, "tray request cancelled");
        event_sender
            .send(Event::TrayRequestCancelled(self.request_id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
