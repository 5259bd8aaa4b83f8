use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::entities::standing_order_line;
use crate::entities::task_completion;
use crate::entities::{maintenance_task, standing_order};
use crate::errors::ServiceError;

use super::Query;

/// Ledger rows for a farm inside a date range (inclusive).
#[derive(Debug, Serialize, Deserialize)]
pub struct GetLedgerRangeQuery {
    pub farm_id: Uuid,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[async_trait]
impl Query for GetLedgerRangeQuery {
    type Result = Vec<task_completion::Model>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Ok(task_completion::Entity::find()
            .filter(task_completion::Column::FarmId.eq(self.farm_id))
            .filter(task_completion::Column::TaskDate.gte(self.from))
            .filter(task_completion::Column::TaskDate.lte(self.to))
            .all(db)
            .await?)
    }
}

/// Active standing orders with their recipe lines, the raw material of the
/// planting schedule.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoadStandingOrdersQuery {
    pub farm_id: Uuid,
}

#[async_trait]
impl Query for LoadStandingOrdersQuery {
    type Result = (
        Vec<standing_order::Model>,
        HashMap<Uuid, Vec<standing_order_line::Model>>,
    );

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let orders = standing_order::Entity::find()
            .filter(standing_order::Column::FarmId.eq(self.farm_id))
            .order_by_asc(standing_order::Column::CreatedAt)
            .all(db)
            .await?;

        let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let mut lines_by_order: HashMap<Uuid, Vec<standing_order_line::Model>> = HashMap::new();
        for line in standing_order_line::Entity::find()
            .filter(standing_order_line::Column::StandingOrderId.is_in(order_ids))
            .all(db)
            .await?
        {
            lines_by_order
                .entry(line.standing_order_id)
                .or_default()
                .push(line);
        }

        Ok((orders, lines_by_order))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListMaintenanceTasksQuery {
    pub farm_id: Uuid,
}

#[async_trait]
impl Query for ListMaintenanceTasksQuery {
    type Result = Vec<maintenance_task::Model>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Ok(maintenance_task::Entity::find()
            .filter(maintenance_task::Column::FarmId.eq(self.farm_id))
            .order_by_asc(maintenance_task::Column::Weekday)
            .all(db)
            .await?)
    }
}
