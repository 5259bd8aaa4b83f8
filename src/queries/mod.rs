use crate::errors::ServiceError;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;

pub mod batch_queries;
pub mod customer_queries;
pub mod recipe_queries;
pub mod task_queries;
pub mod tray_queries;

/// Read-side counterpart of `Command`: a self-contained query object.
#[async_trait]
pub trait Query: Send + Sync {
    type Result: Send + Sync;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError>;
}
