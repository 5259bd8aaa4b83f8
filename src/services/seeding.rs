use std::sync::Arc;

use chrono::NaiveDate;
use tracing::instrument;
use uuid::Uuid;

use crate::commands::seeding::{
    CancelTrayRequestCommand, FulfillOutcome, FulfillSeedTaskCommand, RequestTraysCommand,
};
use crate::commands::Command;
use crate::db::DbPool;
use crate::entities::tray_request;
use crate::errors::ServiceError;
use crate::events::EventSender;
use crate::queries::tray_queries::ListPendingTrayRequestsQuery;
use crate::queries::Query;

/// Front door of the seeding request pipeline.
#[derive(Clone)]
pub struct SeedingService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl SeedingService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Manual batch-of-N request: no inventory touched, one pending row.
    #[instrument(skip(self))]
    pub async fn request_trays(
        &self,
        farm_id: Uuid,
        recipe_id: Uuid,
        quantity: i32,
        sow_date: NaiveDate,
    ) -> Result<tray_request::Model, ServiceError> {
        RequestTraysCommand {
            farm_id,
            recipe_id,
            quantity,
            sow_date,
        }
        .execute(self.db.clone(), self.event_sender.clone())
        .await
    }

    /// Seed-task completion with an operator-chosen batch.
    #[instrument(skip(self))]
    pub async fn fulfill_seed_task(
        &self,
        farm_id: Uuid,
        recipe_id: Uuid,
        task_date: NaiveDate,
        quantity: i32,
        batch_id: Option<Uuid>,
    ) -> Result<FulfillOutcome, ServiceError> {
        FulfillSeedTaskCommand {
            farm_id,
            recipe_id,
            task_date,
            quantity,
            batch_id,
        }
        .execute(self.db.clone(), self.event_sender.clone())
        .await
    }

    #[instrument(skip(self))]
    pub async fn cancel_request(
        &self,
        farm_id: Uuid,
        request_id: Uuid,
    ) -> Result<tray_request::Model, ServiceError> {
        CancelTrayRequestCommand {
            farm_id,
            request_id,
        }
        .execute(self.db.clone(), self.event_sender.clone())
        .await
    }

    #[instrument(skip(self))]
    pub async fn list_pending_requests(
        &self,
        farm_id: Uuid,
    ) -> Result<Vec<tray_request::Model>, ServiceError> {
        ListPendingTrayRequestsQuery { farm_id }.execute(&self.db).await
    }
}
