use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A recurring chore scheduled by day of week (sanitize racks, rotate
/// stock). Injected into weekly task lists without recipe-key merging.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "maintenance_tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub farm_id: Uuid,
    pub description: String,

    /// Weekday the chore falls on, 0 = Monday
    pub weekday: i32,

    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
