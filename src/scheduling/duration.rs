use crate::entities::recipe_step::{self, DurationUnit};

/// Hour-denominated steps at or above this magnitude count as one day.
const HOURS_ROUNDING_THRESHOLD: i32 = 12;

/// Reduces a recipe's ordered step list to its total grow time in whole
/// days.
///
/// Day steps contribute their magnitude. Hour steps contribute one day when
/// they run 12 hours or longer, otherwise nothing. An empty step list yields
/// 0, so any date computed from it equals the sow date.
pub fn grow_days(steps: &[recipe_step::Model]) -> i64 {
    let mut ordered: Vec<&recipe_step::Model> = steps.iter().collect();
    ordered.sort_by_key(|s| s.sequence);

    ordered
        .iter()
        .map(|step| match step.duration_unit {
            DurationUnit::Day => i64::from(step.duration_value),
            DurationUnit::Hour => {
                if step.duration_value >= HOURS_ROUNDING_THRESHOLD {
                    1
                } else {
                    0
                }
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use uuid::Uuid;

    fn step(sequence: i32, value: i32, unit: DurationUnit) -> recipe_step::Model {
        recipe_step::Model {
            id: Uuid::new_v4(),
            recipe_id: Uuid::new_v4(),
            sequence,
            description: format!("step {}", sequence),
            duration_value: value,
            duration_unit: unit,
        }
    }

    #[test]
    fn sums_days_and_rounds_hours() {
        let steps = vec![
            step(1, 3, DurationUnit::Day),
            step(2, 18, DurationUnit::Hour),
            step(3, 6, DurationUnit::Hour),
        ];
        assert_eq!(grow_days(&steps), 4);
    }

    #[test]
    fn empty_recipe_is_zero_days() {
        assert_eq!(grow_days(&[]), 0);
    }

    #[test_case(11, 0; "just under the threshold")]
    #[test_case(12, 1; "at the threshold")]
    #[test_case(36, 1; "hours never contribute more than one day")]
    fn hour_step_rounding(hours: i32, expected: i64) {
        let steps = vec![step(1, hours, DurationUnit::Hour)];
        assert_eq!(grow_days(&steps), expected);
    }

    #[test]
    fn order_of_input_does_not_change_the_sum() {
        let forward = vec![step(1, 2, DurationUnit::Day), step(2, 14, DurationUnit::Hour)];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();
        assert_eq!(grow_days(&forward), grow_days(&reversed));
    }
}
