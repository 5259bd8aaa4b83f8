use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A growth recipe: the ordered procedure for taking one crop from seed to
/// harvest. Recipes with no `farm_id` are shared templates; a farm gets its
/// own copy the first time a template is used (copy-on-use).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning farm; NULL marks a global template
    pub farm_id: Option<Uuid>,

    /// Template this recipe was copied from, when it was copied
    pub source_recipe_id: Option<Uuid>,

    pub name: String,

    /// Crop this recipe grows; drives seed-mass lookups
    pub variety_id: Option<Uuid>,

    /// Whether seed must soak before sowing
    pub requires_soak: bool,

    /// Soak duration when `requires_soak` is set
    pub soak_hours: Option<i32>,

    /// Days between harvest and delivery
    pub lead_time_days: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipe_step::Entity")]
    Steps,
}

impl Related<super::recipe_step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Steps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Shared templates are farm-less; everything else belongs to one farm.
    pub fn is_template(&self) -> bool {
        self.farm_id.is_none()
    }
}
