use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::seed_batch;
use crate::errors::ServiceError;

use super::Query;

/// All of a farm's batches for one variety, oldest purchase first.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListBatchesForVarietyQuery {
    pub farm_id: Uuid,
    pub variety_id: Uuid,
}

#[async_trait]
impl Query for ListBatchesForVarietyQuery {
    type Result = Vec<seed_batch::Model>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Ok(seed_batch::Entity::find()
            .filter(seed_batch::Column::FarmId.eq(self.farm_id))
            .filter(seed_batch::Column::VarietyId.eq(self.variety_id))
            .order_by_asc(seed_batch::Column::PurchaseDate)
            .all(db)
            .await?)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListFarmBatchesQuery {
    pub farm_id: Uuid,
}

#[async_trait]
impl Query for ListFarmBatchesQuery {
    type Result = Vec<seed_batch::Model>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Ok(seed_batch::Entity::find()
            .filter(seed_batch::Column::FarmId.eq(self.farm_id))
            .order_by_asc(seed_batch::Column::PurchaseDate)
            .all(db)
            .await?)
    }
}
