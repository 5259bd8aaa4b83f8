use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A purchased quantity of seed stock for one variety.
///
/// `remaining_grams` is authoritative and always in grams; it is decremented
/// by the persistence layer when fulfilled tray requests become trays, never
/// by the scheduling engine itself.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "seed_batches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub farm_id: Uuid,
    pub variety_id: Uuid,

    /// Supplier lot code for traceability
    pub lot_code: String,

    pub remaining_grams: Decimal,

    /// Used for earliest-purchase-first ordering of candidates
    pub purchase_date: NaiveDate,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn can_cover(&self, required_grams: Decimal) -> bool {
        self.remaining_grams >= required_grams
    }
}
