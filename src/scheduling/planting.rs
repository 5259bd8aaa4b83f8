use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use crate::entities::task_completion::TaskType;
use crate::entities::{recipe, recipe_step, standing_order, standing_order_line, variety};

use super::duration::grow_days;

/// A recipe with everything the scheduler needs alongside it.
#[derive(Debug, Clone)]
pub struct RecipePlan {
    pub recipe: recipe::Model,
    pub steps: Vec<recipe_step::Model>,
    pub variety: Option<variety::Model>,
}

impl RecipePlan {
    pub fn grow_days(&self) -> i64 {
        grow_days(&self.steps)
    }

    pub fn seed_grams_per_tray(&self) -> Option<Decimal> {
        self.variety.as_ref().and_then(|v| v.seed_grams_per_tray())
    }

    /// Crop label shown on tasks: the variety name when linked, otherwise
    /// the recipe name.
    pub fn crop_label(&self) -> &str {
        self.variety
            .as_ref()
            .map(|v| v.name.as_str())
            .unwrap_or(self.recipe.name.as_str())
    }
}

/// One dated unit of work derived from a standing order line. Never
/// persisted; regenerated on demand.
#[derive(Debug, Clone)]
pub struct ScheduleEntry {
    pub task_type: TaskType,
    pub date: NaiveDate,
    pub recipe_id: Uuid,
    pub recipe_name: String,
    pub crop: String,
    pub customer_id: Uuid,
    pub product_name: Option<String>,
    /// Fractional trays this line consumes per delivery
    pub tray_count: Decimal,
    pub seed_grams_per_tray: Option<Decimal>,
    pub delivery_date: NaiveDate,
    pub lead_time_days: i32,
}

/// Loaded standing-order data plus recipe plans; the input to schedule
/// derivation.
#[derive(Debug, Default)]
pub struct PlantingContext {
    pub recipes: HashMap<Uuid, RecipePlan>,
    pub orders: Vec<standing_order::Model>,
    pub lines_by_order: HashMap<Uuid, Vec<standing_order_line::Model>>,
}

impl PlantingContext {
    /// All schedule entries whose own task date falls in `[from, to]`
    /// (inclusive). A soak task dated the day before its sow date belongs to
    /// the window containing the soak date, regardless of where the sow date
    /// lands.
    pub fn entries_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<ScheduleEntry> {
        let mut entries = Vec::new();

        for order in self.orders.iter().filter(|o| o.active) {
            let lines = match self.lines_by_order.get(&order.id) {
                Some(lines) => lines,
                None => continue,
            };

            for line in lines {
                let plan = match self.recipes.get(&line.recipe_id) {
                    Some(plan) => plan,
                    None => continue,
                };

                let grow = plan.grow_days();
                let lead = i64::from(plan.recipe.lead_time_days);
                // Deliveries this far past the window can still put a soak
                // task inside it.
                let horizon_end = to + Duration::days(grow + lead + 1);

                for delivery in occurrences(order.delivery_weekday, from, horizon_end) {
                    let harvest = delivery - Duration::days(lead);
                    let sow = harvest - Duration::days(grow);

                    let mut dated: Vec<(TaskType, NaiveDate)> = vec![
                        (TaskType::Seed, sow),
                        (TaskType::Harvest, harvest),
                        (TaskType::Deliver, delivery),
                    ];
                    if plan.recipe.requires_soak {
                        dated.push((TaskType::Soak, sow - Duration::days(1)));
                    }

                    for (task_type, date) in dated {
                        if date < from || date > to {
                            continue;
                        }
                        entries.push(ScheduleEntry {
                            task_type,
                            date,
                            recipe_id: plan.recipe.id,
                            recipe_name: plan.recipe.name.clone(),
                            crop: plan.crop_label().to_string(),
                            customer_id: order.customer_id,
                            product_name: line.product_name.clone(),
                            tray_count: line.tray_count,
                            seed_grams_per_tray: plan.seed_grams_per_tray(),
                            delivery_date: delivery,
                            lead_time_days: plan.recipe.lead_time_days,
                        });
                    }
                }
            }
        }

        entries.sort_by(|a, b| {
            (a.date, type_rank(a.task_type), &a.recipe_name, a.customer_id).cmp(&(
                b.date,
                type_rank(b.task_type),
                &b.recipe_name,
                b.customer_id,
            ))
        });
        entries
    }
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Display ordering for task types within one day.
pub(crate) fn type_rank(task_type: TaskType) -> u8 {
    match task_type {
        TaskType::Soak => 0,
        TaskType::Seed => 1,
        TaskType::Harvest => 2,
        TaskType::Deliver => 3,
        TaskType::Maintenance => 4,
    }
}

/// Dates in `[from, to]` falling on `weekday` (0 = Monday).
fn occurrences(weekday: i32, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let offset = (weekday - from.weekday().num_days_from_monday() as i32).rem_euclid(7);
    let mut current = from + Duration::days(i64::from(offset));
    let mut dates = Vec::new();
    while current <= to {
        dates.push(current);
        current += Duration::days(7);
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::recipe_step::DurationUnit;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn context_with_recipe(
        grow_day_steps: i32,
        requires_soak: bool,
        lead_time_days: i32,
        delivery_weekday: i32,
        tray_count: Decimal,
    ) -> PlantingContext {
        let recipe_id = Uuid::new_v4();
        let order_id = Uuid::new_v4();

        let recipe = recipe::Model {
            id: recipe_id,
            farm_id: Some(Uuid::new_v4()),
            source_recipe_id: None,
            name: "Pea Shoots".into(),
            variety_id: None,
            requires_soak,
            soak_hours: requires_soak.then_some(12),
            lead_time_days,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let steps = vec![recipe_step::Model {
            id: Uuid::new_v4(),
            recipe_id,
            sequence: 1,
            description: "Growing".into(),
            duration_value: grow_day_steps,
            duration_unit: DurationUnit::Day,
        }];

        let order = standing_order::Model {
            id: order_id,
            farm_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            delivery_weekday,
            active: true,
            created_at: Utc::now(),
        };
        let line = standing_order_line::Model {
            id: Uuid::new_v4(),
            standing_order_id: order_id,
            recipe_id,
            product_name: None,
            tray_count,
        };

        let mut recipes = HashMap::new();
        recipes.insert(
            recipe_id,
            RecipePlan {
                recipe,
                steps,
                variety: None,
            },
        );
        let mut lines_by_order = HashMap::new();
        lines_by_order.insert(order_id, vec![line]);

        PlantingContext {
            recipes,
            orders: vec![order],
            lines_by_order,
        }
    }

    #[rstest::rstest]
    #[case::friday(date(2024, 5, 10))]
    #[case::monday(date(2024, 5, 6))]
    #[case::sunday(date(2024, 5, 12))]
    fn week_start_is_the_containing_monday(#[case] day: NaiveDate) {
        assert_eq!(week_start(day), date(2024, 5, 6));
    }

    #[test]
    fn sow_date_is_backcomputed_from_delivery() {
        // 7 grow days, 1 lead day, delivery on Friday (weekday 4).
        let ctx = context_with_recipe(7, false, 1, 4, dec!(2));
        let entries = ctx.entries_between(date(2024, 5, 6), date(2024, 5, 12));

        let sow: Vec<_> = entries
            .iter()
            .filter(|e| e.task_type == TaskType::Seed)
            .collect();
        // Delivery 2024-05-17 (Fri) -> harvest 05-16 -> sow 05-09
        assert_eq!(sow.len(), 1);
        assert_eq!(sow[0].date, date(2024, 5, 9));
        assert_eq!(sow[0].delivery_date, date(2024, 5, 17));
    }

    #[test]
    fn soak_lands_one_day_before_sow_even_across_week_boundary() {
        // Grow 3 days, no lead, delivery on Monday (weekday 0):
        // delivery 2024-05-13 -> sow 05-10 -> soak 05-09.
        let ctx = context_with_recipe(3, true, 0, 0, dec!(1));

        let previous_week = ctx.entries_between(date(2024, 5, 6), date(2024, 5, 12));
        let soak: Vec<_> = previous_week
            .iter()
            .filter(|e| e.task_type == TaskType::Soak)
            .collect();
        assert!(
            soak.iter().any(|e| e.date == date(2024, 5, 9)),
            "soak for sow 05-10 must appear dated 05-09 in the window containing 05-09"
        );

        // And the sow itself belongs to the same window here (05-10).
        assert!(previous_week
            .iter()
            .any(|e| e.task_type == TaskType::Seed && e.date == date(2024, 5, 10)));
    }

    #[test]
    fn zero_step_recipe_sows_on_harvest_day() {
        let ctx = {
            let mut c = context_with_recipe(0, false, 0, 2, dec!(1));
            for plan in c.recipes.values_mut() {
                plan.steps.clear();
            }
            c
        };
        let entries = ctx.entries_between(date(2024, 5, 6), date(2024, 5, 12));
        let on_wednesday: Vec<_> = entries.iter().filter(|e| e.date == date(2024, 5, 8)).collect();
        // Sow, harvest, and delivery all collapse onto the same date.
        assert_eq!(on_wednesday.len(), 3);
    }

    #[test]
    fn inactive_orders_produce_nothing() {
        let mut ctx = context_with_recipe(7, false, 1, 4, dec!(2));
        ctx.orders[0].active = false;
        assert!(ctx
            .entries_between(date(2024, 5, 6), date(2024, 5, 12))
            .is_empty());
    }

    #[test]
    fn weekly_window_repeats_deliveries_weekly() {
        let ctx = context_with_recipe(2, false, 0, 3, dec!(1));
        let entries = ctx.entries_between(date(2024, 5, 6), date(2024, 5, 19));
        let deliveries: Vec<_> = entries
            .iter()
            .filter(|e| e.task_type == TaskType::Deliver)
            .map(|e| e.date)
            .collect();
        assert_eq!(deliveries, vec![date(2024, 5, 9), date(2024, 5, 16)]);
    }
}
