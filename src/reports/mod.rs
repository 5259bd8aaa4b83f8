use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::task_completion::TaskType;
use crate::scheduling::planting::ScheduleEntry;
use crate::scheduling::tasks::ceil_trays;

/// Printable plan for one sow date: what to seed, how much, and for whom.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SeedingPlan {
    pub sow_date: NaiveDate,
    pub recipes: Vec<RecipeGroup>,
    pub summary: PlanSummary,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeGroup {
    pub recipe_id: Uuid,
    pub recipe_name: String,
    pub crop: String,
    /// Σ ceil(order line trays) — partial trays round up per line
    pub total_trays: i32,
    pub seed_grams_per_tray: Option<Decimal>,
    /// Per-tray requirement × total trays, when the requirement is known
    pub total_seed_grams: Option<Decimal>,
    pub orders: Vec<ContributingOrder>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContributingOrder {
    pub customer_id: Uuid,
    pub product_name: Option<String>,
    /// The line's fractional tray share
    pub tray_count: Decimal,
    /// What actually gets sown for this line
    pub trays_to_sow: i32,
    pub delivery_date: NaiveDate,
    pub lead_time_days: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlanSummary {
    pub variety_count: usize,
    pub total_trays: i32,
    pub total_seed_grams: Decimal,
}

/// Groups one date's sow entries by recipe. Pure read-time projection; no
/// side effects.
pub fn build_seeding_plan(sow_date: NaiveDate, entries: &[ScheduleEntry]) -> SeedingPlan {
    // BTreeMap keyed by recipe name keeps the printed order stable.
    let mut groups: BTreeMap<(String, Uuid), RecipeGroup> = BTreeMap::new();

    for entry in entries
        .iter()
        .filter(|e| e.task_type == TaskType::Seed && e.date == sow_date)
    {
        let trays_to_sow = ceil_trays(entry.tray_count);
        let group = groups
            .entry((entry.recipe_name.clone(), entry.recipe_id))
            .or_insert_with(|| RecipeGroup {
                recipe_id: entry.recipe_id,
                recipe_name: entry.recipe_name.clone(),
                crop: entry.crop.clone(),
                total_trays: 0,
                seed_grams_per_tray: entry.seed_grams_per_tray,
                total_seed_grams: None,
                orders: Vec::new(),
            });
        group.total_trays += trays_to_sow;
        group.orders.push(ContributingOrder {
            customer_id: entry.customer_id,
            product_name: entry.product_name.clone(),
            tray_count: entry.tray_count,
            trays_to_sow,
            delivery_date: entry.delivery_date,
            lead_time_days: entry.lead_time_days,
        });
    }

    let mut recipes: Vec<RecipeGroup> = groups.into_values().collect();
    for group in &mut recipes {
        group.total_seed_grams = group
            .seed_grams_per_tray
            .map(|per_tray| per_tray * Decimal::from(group.total_trays));
    }

    let summary = PlanSummary {
        variety_count: recipes.len(),
        total_trays: recipes.iter().map(|g| g.total_trays).sum(),
        total_seed_grams: recipes
            .iter()
            .filter_map(|g| g.total_seed_grams)
            .sum(),
    };

    SeedingPlan {
        sow_date,
        recipes,
        summary,
    }
}
