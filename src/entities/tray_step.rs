use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TrayStepStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "skipped")]
    Skipped,
}

/// A tray's copy of one recipe step, stamped with a concrete scheduled date.
/// The earliest pending row names the tray's current stage.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tray_steps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub tray_id: Uuid,

    pub step_description: String,
    pub sequence: i32,
    pub scheduled_date: NaiveDate,

    pub status: TrayStepStatus,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tray::Entity",
        from = "Column::TrayId",
        to = "super::tray::Column::Id"
    )]
    Tray,
}

impl Related<super::tray::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tray.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_pending(&self) -> bool {
        self.status == TrayStepStatus::Pending
    }
}
