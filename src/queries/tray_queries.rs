use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::entities::tray::TrayStatus;
use crate::entities::{tray, tray_request, tray_step};
use crate::errors::ServiceError;

use super::Query;

#[derive(Debug, Serialize, Deserialize)]
pub struct ListTraysQuery {
    pub farm_id: Uuid,
}

#[async_trait]
impl Query for ListTraysQuery {
    type Result = Vec<tray::Model>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Ok(tray::Entity::find()
            .filter(tray::Column::FarmId.eq(self.farm_id))
            .order_by_desc(tray::Column::SowDate)
            .all(db)
            .await?)
    }
}

/// Step rows for a set of trays, grouped by tray.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetStepsForTraysQuery {
    pub tray_ids: Vec<Uuid>,
}

#[async_trait]
impl Query for GetStepsForTraysQuery {
    type Result = HashMap<Uuid, Vec<tray_step::Model>>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let mut by_tray: HashMap<Uuid, Vec<tray_step::Model>> = HashMap::new();
        for step in tray_step::Entity::find()
            .filter(tray_step::Column::TrayId.is_in(self.tray_ids.clone()))
            .order_by_asc(tray_step::Column::ScheduledDate)
            .all(db)
            .await?
        {
            by_tray.entry(step.tray_id).or_default().push(step);
        }
        Ok(by_tray)
    }
}

/// Steps scheduled on one date, paired with their trays, lost trays
/// excluded. Feeds the daily task list; the caller derives per-group
/// completion from the step statuses.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetStepsForDateQuery {
    pub farm_id: Uuid,
    pub date: NaiveDate,
}

#[async_trait]
impl Query for GetStepsForDateQuery {
    type Result = Vec<(tray_step::Model, tray::Model)>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let steps = tray_step::Entity::find()
            .filter(tray_step::Column::ScheduledDate.eq(self.date))
            .order_by_asc(tray_step::Column::Sequence)
            .all(db)
            .await?;

        let tray_ids: Vec<Uuid> = steps.iter().map(|s| s.tray_id).collect();
        let trays: HashMap<Uuid, tray::Model> = tray::Entity::find()
            .filter(tray::Column::Id.is_in(tray_ids))
            .filter(tray::Column::FarmId.eq(self.farm_id))
            .filter(tray::Column::Status.ne(TrayStatus::Lost))
            .all(db)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        Ok(steps
            .into_iter()
            .filter_map(|s| trays.get(&s.tray_id).cloned().map(|t| (s, t)))
            .collect())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListPendingTrayRequestsQuery {
    pub farm_id: Uuid,
}

#[async_trait]
impl Query for ListPendingTrayRequestsQuery {
    type Result = Vec<tray_request::Model>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Ok(tray_request::Entity::find()
            .filter(tray_request::Column::FarmId.eq(self.farm_id))
            .filter(tray_request::Column::Status.eq(tray_request::TrayRequestStatus::Pending))
            .order_by_asc(tray_request::Column::SowDate)
            .all(db)
            .await?)
    }
}
