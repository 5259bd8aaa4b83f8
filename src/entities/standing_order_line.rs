use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One recipe's share of a standing order. `tray_count` may be fractional
/// (a delivery can consume part of a tray); sowing rounds up per line.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "standing_order_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub standing_order_id: Uuid,
    pub recipe_id: Uuid,

    /// Display name of the delivered product, when it differs from the recipe
    pub product_name: Option<String>,

    pub tray_count: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::standing_order::Entity",
        from = "Column::StandingOrderId",
        to = "super::standing_order::Column::Id"
    )]
    Order,
}

impl Related<super::standing_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
