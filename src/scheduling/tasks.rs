use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::maintenance_task;
use crate::entities::task_completion::{self, CompletionStatus, TaskType};

use super::planting::{type_rank, ScheduleEntry};

/// Composite identity of a schedule-derived task. The same logical task is
/// re-derived on every load; this key is what ties it to its ledger row.
///
/// Soak/seed/harvest tasks are recipe-keyed (merged across customers);
/// deliveries keep the customer and product so each drop-off stays its own
/// task. Maintenance chores carry their description in `product_name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub struct TaskKey {
    pub task_type: TaskType,
    pub date: NaiveDate,
    pub recipe_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub product_name: Option<String>,
}

/// How a task is completed: through the ledger, or by updating the tray
/// step rows it was expanded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskRef {
    Ledger { key: TaskKey },
    TraySteps { step_ids: Vec<Uuid> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
}

impl From<CompletionStatus> for TaskStatus {
    fn from(status: CompletionStatus) -> Self {
        match status {
            CompletionStatus::Completed => TaskStatus::Completed,
            CompletionStatus::InProgress => TaskStatus::InProgress,
            CompletionStatus::Skipped => TaskStatus::Skipped,
        }
    }
}

/// One row of a generated task list.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TaskItem {
    pub reference: TaskRef,
    pub date: NaiveDate,
    /// Action label, e.g. "Sow trays", "Harvest", or a step description
    pub action: String,
    /// Crop or variety the task concerns
    pub crop: Option<String>,
    /// Trays affected, or requested quantity for not-yet-created trays
    pub quantity: i32,
    /// Concrete trays, when the task was expanded from tray steps
    pub tray_ids: Vec<Uuid>,
    pub urgent: bool,
    pub status: TaskStatus,
}

/// Partial trays cannot be sown; every contributing line rounds up.
pub fn ceil_trays(count: Decimal) -> i32 {
    count.ceil().to_i32().unwrap_or(0)
}

fn action_label(task_type: TaskType) -> &'static str {
    match task_type {
        TaskType::Soak => "Soak seed",
        TaskType::Seed => "Sow trays",
        TaskType::Harvest => "Harvest",
        TaskType::Deliver => "Deliver",
        TaskType::Maintenance => "Maintenance",
    }
}

fn is_urgent(task_type: TaskType) -> bool {
    matches!(task_type, TaskType::Seed | TaskType::Harvest)
}

/// Ledger key for a schedule entry. Deliveries keep their customer and
/// product; everything else merges per recipe.
fn entry_key(entry: &ScheduleEntry) -> TaskKey {
    let per_customer = entry.task_type == TaskType::Deliver;
    TaskKey {
        task_type: entry.task_type,
        date: entry.date,
        recipe_id: Some(entry.recipe_id),
        customer_id: per_customer.then_some(entry.customer_id),
        product_name: if per_customer {
            entry.product_name.clone()
        } else {
            None
        },
    }
}

/// Collapses schedule entries into task items, merging entries with
/// identical composite keys and summing their (ceiling-rounded) tray
/// quantities. Running this twice over the same entries yields identical
/// output.
pub fn schedule_tasks(entries: &[ScheduleEntry]) -> Vec<TaskItem> {
    let mut merged: HashMap<TaskKey, TaskItem> = HashMap::new();
    for entry in entries {
        let key = entry_key(entry);
        let quantity = ceil_trays(entry.tray_count);
        merged
            .entry(key.clone())
            .and_modify(|task| task.quantity += quantity)
            .or_insert_with(|| TaskItem {
                reference: TaskRef::Ledger { key },
                date: entry.date,
                action: action_label(entry.task_type).to_string(),
                crop: Some(entry.crop.clone()),
                quantity,
                tray_ids: Vec::new(),
                urgent: is_urgent(entry.task_type),
                status: TaskStatus::Pending,
            });
    }

    let mut tasks: Vec<TaskItem> = merged.into_values().collect();
    sort_tasks(&mut tasks);
    tasks
}

/// Maintenance chores land on their weekday inside the window, one task per
/// definition, never merged with recipe-keyed tasks. The chore description
/// rides in the key's product slot so distinct chores stay distinct.
pub fn maintenance_tasks(
    defs: &[maintenance_task::Model],
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<TaskItem> {
    let mut tasks = Vec::new();
    for def in defs.iter().filter(|d| d.active) {
        let date = window_start + chrono::Duration::days(i64::from(def.weekday));
        if date < window_start || date > window_end {
            continue;
        }
        tasks.push(TaskItem {
            reference: TaskRef::Ledger {
                key: TaskKey {
                    task_type: TaskType::Maintenance,
                    date,
                    recipe_id: None,
                    customer_id: None,
                    product_name: Some(def.description.clone()),
                },
            },
            date,
            action: def.description.clone(),
            crop: None,
            quantity: 1,
            tray_ids: Vec::new(),
            urgent: false,
            status: TaskStatus::Pending,
        });
    }
    tasks
}

/// Soaked seed whose usable window ends today. Escalates the matching sow
/// task, or surfaces a standalone urgent task when no schedule-derived sow
/// task exists (ad-hoc soaks).
#[derive(Debug, Clone)]
pub struct ExpiringSeed {
    pub recipe_id: Uuid,
    pub crop: Option<String>,
    pub quantity: i32,
}

pub fn merge_expiring_seed(
    tasks: &mut Vec<TaskItem>,
    expiring: &[ExpiringSeed],
    date: NaiveDate,
) {
    for event in expiring {
        let key = TaskKey {
            task_type: TaskType::Seed,
            date,
            recipe_id: Some(event.recipe_id),
            customer_id: None,
            product_name: None,
        };
        let existing = tasks
            .iter()
            .position(|t| matches!(&t.reference, TaskRef::Ledger { key: k } if *k == key));
        match existing {
            Some(index) => {
                let task = &mut tasks[index];
                task.urgent = true;
                task.action = "Sow soaked seed (expiring)".to_string();
            }
            None => tasks.push(TaskItem {
                reference: TaskRef::Ledger { key },
                date,
                action: "Sow soaked seed (expiring)".to_string(),
                crop: event.crop.clone(),
                quantity: event.quantity,
                tray_ids: Vec::new(),
                urgent: true,
                status: TaskStatus::Pending,
            }),
        }
    }
    sort_tasks(tasks);
}

/// Resolves completion state against the ledger: a matching row dictates
/// the status, absence means Pending. Tray-step tasks are untouched; their
/// state comes from the step rows themselves.
pub fn apply_ledger(tasks: &mut [TaskItem], ledger: &[task_completion::Model]) {
    let by_key: HashMap<TaskKey, CompletionStatus> = ledger
        .iter()
        .map(|row| {
            (
                TaskKey {
                    task_type: row.task_type,
                    date: row.task_date,
                    recipe_id: row.recipe_key(),
                    customer_id: row.customer_key(),
                    product_name: row.product_key(),
                },
                row.status,
            )
        })
        .collect();

    for task in tasks.iter_mut() {
        if let TaskRef::Ledger { key } = &task.reference {
            task.status = by_key
                .get(key)
                .map(|status| TaskStatus::from(*status))
                .unwrap_or(TaskStatus::Pending);
        }
    }
}

/// Deterministic ordering: date, task type, labels, then the full composite
/// key, so regenerated lists always come back in the same order.
pub fn sort_tasks(tasks: &mut [TaskItem]) {
    tasks.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
}

type SortKey = (
    NaiveDate,
    u8,
    String,
    Option<String>,
    Option<Uuid>,
    Option<Uuid>,
    Option<String>,
);

fn sort_key(task: &TaskItem) -> SortKey {
    match &task.reference {
        TaskRef::Ledger { key } => (
            task.date,
            type_rank(key.task_type),
            task.action.clone(),
            task.crop.clone(),
            key.recipe_id,
            key.customer_id,
            key.product_name.clone(),
        ),
        TaskRef::TraySteps { step_ids } => (
            task.date,
            5,
            task.action.clone(),
            task.crop.clone(),
            step_ids.first().copied(),
            None,
            None,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(
        task_type: TaskType,
        day: NaiveDate,
        recipe_id: Uuid,
        customer_id: Uuid,
        tray_count: Decimal,
    ) -> ScheduleEntry {
        ScheduleEntry {
            task_type,
            date: day,
            recipe_id,
            recipe_name: "Radish".into(),
            crop: "Radish".into(),
            customer_id,
            product_name: None,
            tray_count,
            seed_grams_per_tray: Some(dec!(30)),
            delivery_date: day,
            lead_time_days: 0,
        }
    }

    #[test]
    fn identical_keys_merge_and_sum_ceiled_quantities() {
        let recipe = Uuid::new_v4();
        let day = date(2024, 5, 9);
        let entries = vec![
            entry(TaskType::Seed, day, recipe, Uuid::new_v4(), dec!(2.4)),
            entry(TaskType::Seed, day, recipe, Uuid::new_v4(), dec!(3.1)),
        ];
        let tasks = schedule_tasks(&entries);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].quantity, 3 + 4);
        assert!(tasks[0].urgent);
    }

    #[test]
    fn deliveries_stay_per_customer() {
        let recipe = Uuid::new_v4();
        let day = date(2024, 5, 9);
        let entries = vec![
            entry(TaskType::Deliver, day, recipe, Uuid::new_v4(), dec!(1)),
            entry(TaskType::Deliver, day, recipe, Uuid::new_v4(), dec!(1)),
        ];
        assert_eq!(schedule_tasks(&entries).len(), 2);
    }

    #[test]
    fn regeneration_is_deterministic() {
        let recipe = Uuid::new_v4();
        let customer = Uuid::new_v4();
        let day = date(2024, 5, 9);
        let entries = vec![
            entry(TaskType::Seed, day, recipe, customer, dec!(2.4)),
            entry(TaskType::Harvest, day, recipe, customer, dec!(2.4)),
            entry(TaskType::Deliver, day, recipe, customer, dec!(2.4)),
        ];
        assert_eq!(schedule_tasks(&entries), schedule_tasks(&entries));
    }

    #[test]
    fn ledger_rows_resolve_status_absence_means_pending() {
        let recipe = Uuid::new_v4();
        let day = date(2024, 5, 9);
        let entries = vec![
            entry(TaskType::Seed, day, recipe, Uuid::new_v4(), dec!(1)),
            entry(TaskType::Harvest, day, recipe, Uuid::new_v4(), dec!(1)),
        ];
        let mut tasks = schedule_tasks(&entries);

        let ledger = vec![task_completion::Model {
            id: Uuid::new_v4(),
            farm_id: Uuid::new_v4(),
            task_type: TaskType::Seed,
            task_date: day,
            recipe_id: recipe,
            customer_id: Uuid::nil(),
            product_name: String::new(),
            status: CompletionStatus::Completed,
            quantity: Some(7),
            completed_at: chrono::Utc::now(),
        }];
        apply_ledger(&mut tasks, &ledger);

        let seed = tasks.iter().find(|t| t.action == "Sow trays").unwrap();
        let harvest = tasks.iter().find(|t| t.action == "Harvest").unwrap();
        assert_eq!(seed.status, TaskStatus::Completed);
        assert_eq!(harvest.status, TaskStatus::Pending);
    }

    #[test]
    fn maintenance_tasks_inject_without_merging() {
        let monday = date(2024, 5, 6);
        let defs = vec![
            maintenance_task::Model {
                id: Uuid::new_v4(),
                farm_id: Uuid::new_v4(),
                description: "Sanitize racks".into(),
                weekday: 0,
                active: true,
            },
            maintenance_task::Model {
                id: Uuid::new_v4(),
                farm_id: Uuid::new_v4(),
                description: "Rotate seed stock".into(),
                weekday: 0,
                active: true,
            },
            maintenance_task::Model {
                id: Uuid::new_v4(),
                farm_id: Uuid::new_v4(),
                description: "Inactive chore".into(),
                weekday: 0,
                active: false,
            },
        ];
        let tasks = maintenance_tasks(&defs, monday, monday + chrono::Duration::days(6));
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.date == monday));
    }

    #[test]
    fn expiring_seed_escalates_existing_sow_task() {
        let recipe = Uuid::new_v4();
        let day = date(2024, 5, 10);
        let entries = vec![entry(TaskType::Seed, day, recipe, Uuid::new_v4(), dec!(2))];
        let mut tasks = schedule_tasks(&entries);

        merge_expiring_seed(
            &mut tasks,
            &[ExpiringSeed {
                recipe_id: recipe,
                crop: Some("Radish".into()),
                quantity: 2,
            }],
            day,
        );

        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].urgent);
        assert_eq!(tasks[0].action, "Sow soaked seed (expiring)");
        assert_eq!(tasks[0].quantity, 2);
    }

    #[test]
    fn expiring_seed_without_schedule_entry_stands_alone() {
        let mut tasks = Vec::new();
        merge_expiring_seed(
            &mut tasks,
            &[ExpiringSeed {
                recipe_id: Uuid::new_v4(),
                crop: Some("Pea".into()),
                quantity: 3,
            }],
            date(2024, 5, 10),
        );
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].urgent);
        assert_eq!(tasks[0].quantity, 3);
    }
}
