use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Unit a step's duration is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum DurationUnit {
    #[sea_orm(string_value = "day")]
    Day,
    #[sea_orm(string_value = "hour")]
    Hour,
}

/// One stage of a recipe. Steps are totally ordered by `sequence` within
/// their recipe; no two steps share a sequence position.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe_steps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub recipe_id: Uuid,

    /// Explicit position within the recipe
    pub sequence: i32,

    pub description: String,

    pub duration_value: i32,
    pub duration_unit: DurationUnit,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::recipe::Entity",
        from = "Column::RecipeId",
        to = "super::recipe::Column::Id"
    )]
    Recipe,
}

impl Related<super::recipe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipe.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
