use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of generated task the ledger row refers to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskType {
    #[sea_orm(string_value = "soak")]
    Soak,
    #[sea_orm(string_value = "seed")]
    Seed,
    #[sea_orm(string_value = "harvest")]
    Harvest,
    #[sea_orm(string_value = "deliver")]
    Deliver,
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CompletionStatus {
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "skipped")]
    Skipped,
}

/// Idempotency ledger for generated tasks.
///
/// Tasks are re-derived from recipes and standing orders on every load; the
/// only record that one was acted on is a row here, keyed by the composite
/// (farm, type, date, recipe, customer, product). Absence of a row means the
/// task is pending. Upserts go through the unique constraint, not
/// check-then-insert.
///
/// The optional key parts are stored as non-null sentinels (nil uuid, empty
/// string) so the unique index actually collides; SQL unique indexes treat
/// NULLs as distinct. Use the `*_key()` accessors to read them as options.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "task_completions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub farm_id: Uuid,
    pub task_type: TaskType,
    pub task_date: NaiveDate,

    /// Nil when the task is not recipe-keyed (maintenance)
    pub recipe_id: Uuid,
    /// Nil for everything except delivery tasks
    pub customer_id: Uuid,
    /// Empty unless the task carries a product or chore description
    pub product_name: String,

    pub status: CompletionStatus,

    /// Quantity recorded at completion time (e.g. trays seeded)
    pub quantity: Option<i32>,

    pub completed_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn recipe_key(&self) -> Option<Uuid> {
        (!self.recipe_id.is_nil()).then_some(self.recipe_id)
    }

    pub fn customer_key(&self) -> Option<Uuid> {
        (!self.customer_id.is_nil()).then_some(self.customer_id)
    }

    pub fn product_key(&self) -> Option<String> {
        (!self.product_name.is_empty()).then(|| self.product_name.clone())
    }
}
