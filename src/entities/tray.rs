use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored status flag. Growing/Harvested/stage names are derived on read by
/// the lifecycle resolver, not persisted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TrayStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "lost")]
    Lost,
}

/// A physical growing unit, created when a seeding request resolves into an
/// allocated batch.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trays")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub farm_id: Uuid,
    pub recipe_id: Uuid,
    pub batch_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,

    pub sow_date: NaiveDate,
    pub harvest_date: Option<NaiveDate>,
    pub yield_grams: Option<Decimal>,

    pub status: TrayStatus,
    pub loss_reason: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tray_step::Entity")]
    Steps,
}

impl Related<super::tray_step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Steps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_lost(&self) -> bool {
        self.status == TrayStatus::Lost
    }

    pub fn is_harvested(&self) -> bool {
        !self.is_lost() && self.harvest_date.is_some()
    }
}
