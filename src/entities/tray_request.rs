use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TrayRequestStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "fulfilled")]
    Fulfilled,
}

/// A queued intent to create trays. Decouples "operator decided to seed"
/// from "inventory was allocated and tray rows were created" — the
/// persistence boundary converts fulfilled requests into trays and
/// decrements the referenced batch.
///
/// Recipe name, variety name, and the step list are snapshotted here so
/// later recipe edits cannot change what a historical request meant.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tray_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub farm_id: Uuid,
    pub recipe_id: Uuid,

    pub recipe_name: String,
    pub variety_name: Option<String>,

    /// Ordered step list at request time, serialized as JSON
    pub steps_snapshot: Json,

    pub quantity: i32,
    pub sow_date: NaiveDate,
    pub batch_id: Option<Uuid>,

    pub status: TrayRequestStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Step snapshot element stored in `steps_snapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSnapshot {
    pub sequence: i32,
    pub description: String,
    pub duration_value: i32,
    pub duration_unit: String,
}
