use chrono::{Days, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{tray, tray_step};

/// Human-facing tray state, derived on read. Only `lost` and the harvest
/// date are stored; everything else is computed from pending step rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "state", content = "stage", rename_all = "snake_case")]
pub enum TrayLifecycle {
    /// Terminal; set only by explicit operator action
    Lost,
    /// Terminal; a harvest date is present
    Harvested,
    /// Named after the earliest-scheduled pending step
    Stage(String),
    /// No pending steps and no terminal flag
    Growing,
}

impl std::fmt::Display for TrayLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrayLifecycle::Lost => write!(f, "Lost"),
            TrayLifecycle::Harvested => write!(f, "Harvested"),
            TrayLifecycle::Stage(name) => write!(f, "{}", name),
            TrayLifecycle::Growing => write!(f, "Growing"),
        }
    }
}

/// Resolves a tray's lifecycle state from its stored flags and step rows.
///
/// Precedence is strict: Lost beats everything, then Harvested, then the
/// earliest pending step (scheduled date, sequence as tie-break), then
/// Growing. A lost tray with pending steps still resolves Lost.
pub fn resolve_lifecycle(tray: &tray::Model, steps: &[tray_step::Model]) -> TrayLifecycle {
    if tray.is_lost() {
        return TrayLifecycle::Lost;
    }
    if tray.is_harvested() {
        return TrayLifecycle::Harvested;
    }

    steps
        .iter()
        .filter(|s| s.is_pending())
        .min_by_key(|s| (s.scheduled_date, s.sequence))
        .map(|s| TrayLifecycle::Stage(s.step_description.clone()))
        .unwrap_or(TrayLifecycle::Growing)
}

/// Projected harvest date: sow date plus total grow time. A zero-step
/// recipe projects harvest on the sow date itself.
pub fn projected_harvest(sow_date: NaiveDate, grow_days: i64) -> NaiveDate {
    sow_date
        .checked_add_days(Days::new(grow_days.max(0) as u64))
        .unwrap_or(sow_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::tray::TrayStatus;
    use crate::entities::tray_step::TrayStepStatus;
    use chrono::Utc;
    use uuid::Uuid;

    fn tray(status: TrayStatus, harvest_date: Option<NaiveDate>) -> tray::Model {
        tray::Model {
            id: Uuid::new_v4(),
            farm_id: Uuid::new_v4(),
            recipe_id: Uuid::new_v4(),
            batch_id: None,
            customer_id: None,
            sow_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            harvest_date,
            yield_grams: None,
            status,
            loss_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn pending_step(description: &str, date: NaiveDate, sequence: i32) -> tray_step::Model {
        tray_step::Model {
            id: Uuid::new_v4(),
            tray_id: Uuid::new_v4(),
            step_description: description.to_string(),
            sequence,
            scheduled_date: date,
            status: TrayStepStatus::Pending,
            completed_at: None,
        }
    }

    #[test]
    fn lost_beats_pending_steps() {
        let t = tray(TrayStatus::Lost, None);
        let tomorrow = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let steps = vec![pending_step("Blackout", tomorrow, 1)];
        assert_eq!(resolve_lifecycle(&t, &steps), TrayLifecycle::Lost);
    }

    #[test]
    fn lost_beats_harvest_date() {
        let harvested = NaiveDate::from_ymd_opt(2024, 5, 9).unwrap();
        let t = tray(TrayStatus::Lost, Some(harvested));
        assert_eq!(resolve_lifecycle(&t, &[]), TrayLifecycle::Lost);
    }

    #[test]
    fn harvest_date_resolves_harvested() {
        let harvested = NaiveDate::from_ymd_opt(2024, 5, 9).unwrap();
        let t = tray(TrayStatus::Active, Some(harvested));
        let steps = vec![pending_step("Uncover", harvested, 1)];
        assert_eq!(resolve_lifecycle(&t, &steps), TrayLifecycle::Harvested);
    }

    #[test]
    fn earliest_pending_step_names_the_stage() {
        let t = tray(TrayStatus::Active, None);
        let d2 = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let d5 = NaiveDate::from_ymd_opt(2024, 5, 5).unwrap();
        let steps = vec![pending_step("Uncover", d5, 2), pending_step("Blackout", d2, 1)];
        assert_eq!(
            resolve_lifecycle(&t, &steps),
            TrayLifecycle::Stage("Blackout".into())
        );
    }

    #[test]
    fn sequence_breaks_same_day_ties() {
        let t = tray(TrayStatus::Active, None);
        let d = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let steps = vec![pending_step("Mist", d, 2), pending_step("Weight", d, 1)];
        assert_eq!(
            resolve_lifecycle(&t, &steps),
            TrayLifecycle::Stage("Weight".into())
        );
    }

    #[test]
    fn no_pending_steps_is_growing() {
        let t = tray(TrayStatus::Active, None);
        let mut done = pending_step("Blackout", NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), 1);
        done.status = TrayStepStatus::Completed;
        assert_eq!(resolve_lifecycle(&t, &[done]), TrayLifecycle::Growing);
    }

    #[test]
    fn zero_day_recipe_projects_harvest_on_sow_date() {
        let sow = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(projected_harvest(sow, 0), sow);
        assert_eq!(
            projected_harvest(sow, 9),
            NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
        );
    }
}
