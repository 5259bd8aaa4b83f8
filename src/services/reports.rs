use std::sync::Arc;

use chrono::NaiveDate;
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::queries::recipe_queries::LoadRecipePlansQuery;
use crate::queries::task_queries::LoadStandingOrdersQuery;
use crate::queries::Query;
use crate::reports::{build_seeding_plan, SeedingPlan};
use crate::scheduling::planting::PlantingContext;

/// Read-only report projections for print/export.
#[derive(Clone)]
pub struct ReportService {
    db: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// The seeding plan for one sow date: per-recipe tray counts and seed
    /// masses with the contributing orders. No side effects.
    #[instrument(skip(self))]
    pub async fn seeding_plan(
        &self,
        farm_id: Uuid,
        sow_date: NaiveDate,
    ) -> Result<SeedingPlan, ServiceError> {
        let recipes = LoadRecipePlansQuery { farm_id }.execute(&self.db).await?;
        let (orders, lines_by_order) =
            LoadStandingOrdersQuery { farm_id }.execute(&self.db).await?;
        let ctx = PlantingContext {
            recipes,
            orders,
            lines_by_order,
        };

        let entries = ctx.entries_between(sow_date, sow_date);
        Ok(build_seeding_plan(sow_date, &entries))
    }
}
