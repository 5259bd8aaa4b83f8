use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Conversion factor for seed requirements recorded in ounces.
pub const GRAMS_PER_OUNCE: Decimal = dec!(28.35);

/// Unit the per-tray seed requirement was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum SeedUnit {
    #[sea_orm(string_value = "gram")]
    Gram,
    #[sea_orm(string_value = "ounce")]
    Ounce,
}

/// A growable crop type. Carries the seed mass needed to sow one tray.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "varieties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    /// Seed mass required to sow one tray, in `seed_unit`
    pub seed_per_tray: Option<Decimal>,

    pub seed_unit: SeedUnit,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Per-tray seed requirement normalized to grams, or None when the
    /// variety has no recorded requirement.
    pub fn seed_grams_per_tray(&self) -> Option<Decimal> {
        self.seed_per_tray.map(|amount| match self.seed_unit {
            SeedUnit::Gram => amount,
            SeedUnit::Ounce => amount * GRAMS_PER_OUNCE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variety(amount: Option<Decimal>, unit: SeedUnit) -> Model {
        Model {
            id: Uuid::new_v4(),
            name: "Sunflower".into(),
            seed_per_tray: amount,
            seed_unit: unit,
        }
    }

    #[test]
    fn grams_pass_through() {
        let v = variety(Some(dec!(125)), SeedUnit::Gram);
        assert_eq!(v.seed_grams_per_tray(), Some(dec!(125)));
    }

    #[test]
    fn ounces_convert() {
        let v = variety(Some(dec!(2)), SeedUnit::Ounce);
        assert_eq!(v.seed_grams_per_tray(), Some(dec!(56.70)));
    }

    #[test]
    fn missing_requirement_is_none() {
        let v = variety(None, SeedUnit::Gram);
        assert_eq!(v.seed_grams_per_tray(), None);
    }
}
