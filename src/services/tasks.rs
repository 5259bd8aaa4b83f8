use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::commands::tasks::SetTaskStatusCommand;
use crate::commands::Command;
use crate::db::DbPool;
use crate::entities::task_completion::{CompletionStatus, TaskType};
use crate::entities::tray_step::TrayStepStatus;
use crate::errors::ServiceError;
use crate::events::EventSender;
use crate::queries::recipe_queries::LoadRecipePlansQuery;
use crate::queries::task_queries::{
    GetLedgerRangeQuery, ListMaintenanceTasksQuery, LoadStandingOrdersQuery,
};
use crate::queries::tray_queries::GetStepsForDateQuery;
use crate::queries::Query;
use crate::scheduling::planting::PlantingContext;
use crate::scheduling::tasks::{
    apply_ledger, maintenance_tasks, merge_expiring_seed, schedule_tasks, sort_tasks,
    ExpiringSeed, TaskItem, TaskRef, TaskStatus,
};
use crate::scheduling::week_start;

/// A week's generated tasks, windowed Monday through Sunday.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeeklyTasks {
    pub week_start: NaiveDate,
    pub tasks: Vec<TaskItem>,
}

/// Task aggregation over the planting schedule, tray steps, and the
/// completion ledger. Everything here is derived; re-running any of it
/// against an unchanged ledger produces the same lists.
#[derive(Clone)]
pub struct TaskService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl TaskService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    async fn load_context(&self, farm_id: Uuid) -> Result<PlantingContext, ServiceError> {
        let recipes = LoadRecipePlansQuery { farm_id }.execute(&self.db).await?;
        let (orders, lines_by_order) =
            LoadStandingOrdersQuery { farm_id }.execute(&self.db).await?;
        Ok(PlantingContext {
            recipes,
            orders,
            lines_by_order,
        })
    }

    /// The day's work: schedule-derived soak/seed tasks, per-step tray
    /// tasks, and expiring-soaked-seed escalations, deduplicated and
    /// resolved against the ledger.
    #[instrument(skip(self))]
    pub async fn daily_tasks(
        &self,
        farm_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<TaskItem>, ServiceError> {
        let ctx = self.load_context(farm_id).await?;
        // The schedule contributes soak and sow work to the daily view;
        // harvest work comes from the trays' own step rows.
        let entries: Vec<_> = ctx
            .entries_between(date, date)
            .into_iter()
            .filter(|e| matches!(e.task_type, TaskType::Soak | TaskType::Seed))
            .collect();
        let mut tasks = schedule_tasks(&entries);

        // Soaked seed from yesterday that was never sown expires today.
        let ledger = GetLedgerRangeQuery {
            farm_id,
            from: date - Duration::days(1),
            to: date,
        }
        .execute(&self.db)
        .await?;

        let expiring: Vec<ExpiringSeed> = ledger
            .iter()
            .filter(|row| {
                row.task_type == TaskType::Soak
                    && row.task_date == date - Duration::days(1)
                    && row.status == CompletionStatus::Completed
            })
            .filter_map(|soak| {
                let recipe_id = soak.recipe_key()?;
                let sown = ledger.iter().any(|row| {
                    row.task_type == TaskType::Seed
                        && row.task_date == date
                        && row.recipe_key() == Some(recipe_id)
                        && row.status == CompletionStatus::Completed
                });
                (!sown).then(|| ExpiringSeed {
                    recipe_id,
                    crop: ctx
                        .recipes
                        .get(&recipe_id)
                        .map(|p| p.crop_label().to_string()),
                    quantity: soak.quantity.unwrap_or(1),
                })
            })
            .collect();
        merge_expiring_seed(&mut tasks, &expiring, date);

        apply_ledger(&mut tasks, &ledger);

        tasks.extend(self.step_tasks(farm_id, date, &ctx).await?);
        sort_tasks(&mut tasks);
        Ok(tasks)
    }

    /// Pending tray-step work for the date, one task per (step, recipe)
    /// bucket with the affected trays. Completion state comes from the step
    /// rows, not the ledger.
    async fn step_tasks(
        &self,
        farm_id: Uuid,
        date: NaiveDate,
        ctx: &PlantingContext,
    ) -> Result<Vec<TaskItem>, ServiceError> {
        let rows = GetStepsForDateQuery { farm_id, date }.execute(&self.db).await?;

        let mut buckets: BTreeMap<(String, Uuid), Vec<(Uuid, Uuid, TrayStepStatus)>> =
            BTreeMap::new();
        for (step, tray) in &rows {
            buckets
                .entry((step.step_description.clone(), tray.recipe_id))
                .or_default()
                .push((step.id, tray.id, step.status));
        }

        Ok(buckets
            .into_iter()
            .map(|((description, recipe_id), members)| {
                let pending_trays: Vec<Uuid> = members
                    .iter()
                    .filter(|(_, _, status)| *status == TrayStepStatus::Pending)
                    .map(|(_, tray_id, _)| *tray_id)
                    .collect();
                let all_resolved = pending_trays.is_empty();
                let urgent = description.to_lowercase().contains("harvest");
                TaskItem {
                    reference: TaskRef::TraySteps {
                        step_ids: members.iter().map(|(step_id, _, _)| *step_id).collect(),
                    },
                    date,
                    action: description,
                    crop: ctx
                        .recipes
                        .get(&recipe_id)
                        .map(|p| p.crop_label().to_string()),
                    quantity: members.len() as i32,
                    tray_ids: pending_trays,
                    urgent,
                    status: if all_resolved {
                        TaskStatus::Completed
                    } else {
                        TaskStatus::Pending
                    },
                }
            })
            .collect())
    }

    /// The week's soak/sow/harvest/delivery tasks plus weekday maintenance
    /// chores, for the Monday-normalized window containing `reference`.
    #[instrument(skip(self))]
    pub async fn weekly_tasks(
        &self,
        farm_id: Uuid,
        reference: NaiveDate,
    ) -> Result<WeeklyTasks, ServiceError> {
        let start = week_start(reference);
        let end = start + Duration::days(6);

        let ctx = self.load_context(farm_id).await?;
        let entries = ctx.entries_between(start, end);
        let mut tasks = schedule_tasks(&entries);

        let defs = ListMaintenanceTasksQuery { farm_id }.execute(&self.db).await?;
        tasks.extend(maintenance_tasks(&defs, start, end));

        let ledger = GetLedgerRangeQuery {
            farm_id,
            from: start,
            to: end,
        }
        .execute(&self.db)
        .await?;
        apply_ledger(&mut tasks, &ledger);

        sort_tasks(&mut tasks);
        Ok(WeeklyTasks {
            week_start: start,
            tasks,
        })
    }

    /// Upserts or clears the ledger row behind a generated task.
    #[instrument(skip(self))]
    #[allow(clippy::too_many_arguments)]
    pub async fn set_task_status(
        &self,
        farm_id: Uuid,
        task_type: TaskType,
        task_date: NaiveDate,
        recipe_id: Option<Uuid>,
        customer_id: Option<Uuid>,
        product_name: Option<String>,
        status: Option<CompletionStatus>,
        quantity: Option<i32>,
    ) -> Result<(), ServiceError> {
        SetTaskStatusCommand {
            farm_id,
            task_type,
            task_date,
            recipe_id,
            customer_id,
            product_name,
            status,
            quantity,
        }
        .execute(self.db.clone(), self.event_sender.clone())
        .await
    }
}
