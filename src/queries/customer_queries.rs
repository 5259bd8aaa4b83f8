use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{customer, variety};
use crate::errors::ServiceError;

use super::Query;

#[derive(Debug, Serialize, Deserialize)]
pub struct ListCustomersQuery {
    pub farm_id: Uuid,
}

#[async_trait]
impl Query for ListCustomersQuery {
    type Result = Vec<customer::Model>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Ok(customer::Entity::find()
            .filter(customer::Column::FarmId.eq(self.farm_id))
            .order_by_asc(customer::Column::Name)
            .all(db)
            .await?)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListVarietiesQuery;

#[async_trait]
impl Query for ListVarietiesQuery {
    type Result = Vec<variety::Model>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Ok(variety::Entity::find()
            .order_by_asc(variety::Column::Name)
            .all(db)
            .await?)
    }
}
