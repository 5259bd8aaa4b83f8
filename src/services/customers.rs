use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::{customer, standing_order, standing_order_line, variety};
use crate::errors::ServiceError;
use crate::queries::customer_queries::{ListCustomersQuery, ListVarietiesQuery};
use crate::queries::task_queries::LoadStandingOrdersQuery;
use crate::queries::Query;

/// A standing order with its recipe lines attached.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StandingOrderDetail {
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub order: standing_order::Model,
    #[schema(value_type = Vec<Object>)]
    pub lines: Vec<standing_order_line::Model>,
}

/// Reads for customers, varieties, and the standing orders that feed the
/// planting schedule.
#[derive(Clone)]
pub struct CustomerService {
    db: Arc<DbPool>,
}

impl CustomerService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list_customers(
        &self,
        farm_id: Uuid,
    ) -> Result<Vec<customer::Model>, ServiceError> {
        ListCustomersQuery { farm_id }.execute(&self.db).await
    }

    #[instrument(skip(self))]
    pub async fn list_varieties(&self) -> Result<Vec<variety::Model>, ServiceError> {
        ListVarietiesQuery.execute(&self.db).await
    }

    #[instrument(skip(self))]
    pub async fn list_standing_orders(
        &self,
        farm_id: Uuid,
    ) -> Result<Vec<StandingOrderDetail>, ServiceError> {
        let (orders, mut lines_by_order) =
            LoadStandingOrdersQuery { farm_id }.execute(&self.db).await?;
        Ok(orders
            .into_iter()
            .map(|order| {
                let lines = lines_by_order.remove(&order.id).unwrap_or_default();
                StandingOrderDetail { order, lines }
            })
            .collect())
    }
}
