mod common;

use rust_decimal_macros::dec;
use uuid::Uuid;

use common::*;
use trayline_api::entities::recipe_step::DurationUnit;
use trayline_api::entities::task_completion::{CompletionStatus, TaskType};
use trayline_api::entities::variety::SeedUnit;
use trayline_api::scheduling::tasks::{TaskRef, TaskStatus};
use trayline_api::services::tasks::TaskService;
use trayline_api::services::trays::TrayService;

#[tokio::test]
async fn weekly_tasks_regenerate_identically_until_the_ledger_changes() {
    let db = test_db().await;
    let (events, _rx) = test_events();
    let farm_id = Uuid::new_v4();

    let variety = insert_variety(&db, "Radish", Some(dec!(30)), SeedUnit::Gram).await;
    let (recipe, _) = insert_recipe(
        &db,
        RecipeSpec {
            farm_id: Some(farm_id),
            name: "Radish",
            variety_id: Some(variety.id),
            requires_soak: false,
            lead_time_days: 1,
            steps: vec![
                (1, "Blackout", 3, DurationUnit::Day),
                (2, "Under lights", 4, DurationUnit::Day),
            ],
        },
    )
    .await;

    // Two customers, same Friday delivery, fractional tray shares.
    insert_standing_order(&db, farm_id, Uuid::new_v4(), 4, vec![(recipe.id, dec!(2.4))]).await;
    insert_standing_order(&db, farm_id, Uuid::new_v4(), 4, vec![(recipe.id, dec!(3.1))]).await;

    let service = TaskService::new(db.clone(), events);
    let monday = date(2024, 5, 6);

    let first = service.weekly_tasks(farm_id, monday).await.unwrap();
    let second = service.weekly_tasks(farm_id, monday).await.unwrap();
    assert_eq!(first.week_start, monday);
    assert_eq!(first.tasks, second.tasks, "regeneration must be byte-stable");

    // Sow for the 05-17 delivery lands on 05-09: one merged task, trays
    // ceiled per line (3 + 4), urgent.
    let sow = first
        .tasks
        .iter()
        .find(|t| t.action == "Sow trays")
        .expect("sow task present");
    assert_eq!(sow.date, date(2024, 5, 9));
    assert_eq!(sow.quantity, 7);
    assert!(sow.urgent);
    assert_eq!(sow.status, TaskStatus::Pending);

    // Deliveries stay per-customer.
    let deliveries: Vec<_> = first.tasks.iter().filter(|t| t.action == "Deliver").collect();
    assert_eq!(deliveries.len(), 2);

    // Complete the sow task, regenerate: only it flips.
    service
        .set_task_status(
            farm_id,
            TaskType::Seed,
            date(2024, 5, 9),
            Some(recipe.id),
            None,
            None,
            Some(CompletionStatus::Completed),
            Some(7),
        )
        .await
        .unwrap();

    let third = service.weekly_tasks(farm_id, monday).await.unwrap();
    let completed: Vec<_> = third
        .tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .collect();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].action, "Sow trays");

    // Back to pending deletes the ledger row; everything is pending again.
    service
        .set_task_status(
            farm_id,
            TaskType::Seed,
            date(2024, 5, 9),
            Some(recipe.id),
            None,
            None,
            None,
            None,
        )
        .await
        .unwrap();
    let fourth = service.weekly_tasks(farm_id, monday).await.unwrap();
    assert!(fourth.tasks.iter().all(|t| t.status == TaskStatus::Pending));
    assert_eq!(fourth.tasks, first.tasks);
}

#[tokio::test]
async fn soak_task_precedes_sow_across_the_week_boundary() {
    let db = test_db().await;
    let (events, _rx) = test_events();
    let farm_id = Uuid::new_v4();

    let variety = insert_variety(&db, "Pea", Some(dec!(100)), SeedUnit::Gram).await;
    // Grow 3 days, no lead, Monday delivery: delivery 05-13 -> sow 05-10,
    // soak 05-09.
    let (recipe, _) = insert_recipe(
        &db,
        RecipeSpec {
            farm_id: Some(farm_id),
            name: "Pea Shoots",
            variety_id: Some(variety.id),
            requires_soak: true,
            lead_time_days: 0,
            steps: vec![(1, "Growing", 3, DurationUnit::Day)],
        },
    )
    .await;
    insert_standing_order(&db, farm_id, Uuid::new_v4(), 0, vec![(recipe.id, dec!(1))]).await;

    let service = TaskService::new(db.clone(), events);
    let week = service.weekly_tasks(farm_id, date(2024, 5, 6)).await.unwrap();

    let soak = week
        .tasks
        .iter()
        .find(|t| t.action == "Soak seed")
        .expect("soak task present in the window containing the soak date");
    assert_eq!(soak.date, date(2024, 5, 9));
    assert!(!soak.urgent);

    let sow = week.tasks.iter().find(|t| t.action == "Sow trays").unwrap();
    assert_eq!(sow.date, date(2024, 5, 10));
}

#[tokio::test]
async fn daily_tasks_bucket_tray_steps_and_track_their_completion() {
    let db = test_db().await;
    let (events, _rx) = test_events();
    let farm_id = Uuid::new_v4();

    let variety = insert_variety(&db, "Radish", Some(dec!(30)), SeedUnit::Gram).await;
    let (recipe, _) = insert_recipe(
        &db,
        RecipeSpec {
            farm_id: Some(farm_id),
            name: "Radish",
            variety_id: Some(variety.id),
            requires_soak: false,
            lead_time_days: 1,
            steps: vec![(1, "Uncover", 3, DurationUnit::Day)],
        },
    )
    .await;

    let today = date(2024, 5, 9);
    let tray_a = insert_tray(&db, farm_id, recipe.id, date(2024, 5, 6)).await;
    let tray_b = insert_tray(&db, farm_id, recipe.id, date(2024, 5, 6)).await;
    let step_a = insert_tray_step(&db, tray_a.id, "Uncover", 1, today).await;
    let step_b = insert_tray_step(&db, tray_b.id, "Uncover", 1, today).await;

    let tasks = TaskService::new(db.clone(), events.clone());
    let daily = tasks.daily_tasks(farm_id, today).await.unwrap();

    let uncover = daily
        .iter()
        .find(|t| t.action == "Uncover")
        .expect("step task present");
    assert_eq!(uncover.quantity, 2);
    assert_eq!(uncover.tray_ids.len(), 2);
    assert_eq!(uncover.status, TaskStatus::Pending);
    assert!(matches!(
        &uncover.reference,
        TaskRef::TraySteps { step_ids } if step_ids.len() == 2
    ));

    // Resolve both steps; the bucket flips to Completed on the next load.
    let trays = TrayService::new(db.clone(), events);
    trays
        .complete_step(farm_id, tray_a.id, step_a.id, false)
        .await
        .unwrap();
    trays
        .complete_step(farm_id, tray_b.id, step_b.id, true)
        .await
        .unwrap();

    let daily_after = tasks.daily_tasks(farm_id, today).await.unwrap();
    let uncover_after = daily_after.iter().find(|t| t.action == "Uncover").unwrap();
    assert_eq!(uncover_after.status, TaskStatus::Completed);
    assert!(uncover_after.tray_ids.is_empty());
}

#[tokio::test]
async fn soaked_seed_left_unsown_surfaces_as_an_urgent_task() {
    let db = test_db().await;
    let (events, _rx) = test_events();
    let farm_id = Uuid::new_v4();

    let variety = insert_variety(&db, "Pea", Some(dec!(100)), SeedUnit::Gram).await;
    let (recipe, _) = insert_recipe(
        &db,
        RecipeSpec {
            farm_id: Some(farm_id),
            name: "Pea Shoots",
            variety_id: Some(variety.id),
            requires_soak: true,
            lead_time_days: 0,
            steps: vec![(1, "Growing", 3, DurationUnit::Day)],
        },
    )
    .await;

    let service = TaskService::new(db.clone(), events);

    // Soak completed yesterday, never sown.
    service
        .set_task_status(
            farm_id,
            TaskType::Soak,
            date(2024, 5, 9),
            Some(recipe.id),
            None,
            None,
            Some(CompletionStatus::Completed),
            Some(2),
        )
        .await
        .unwrap();

    let daily = service.daily_tasks(farm_id, date(2024, 5, 10)).await.unwrap();
    let expiring = daily
        .iter()
        .find(|t| t.action == "Sow soaked seed (expiring)")
        .expect("expiring-seed task present");
    assert!(expiring.urgent);
    assert_eq!(expiring.quantity, 2);
    assert_eq!(expiring.crop.as_deref(), Some("Pea"));

    // Once the seed task is completed, the escalation disappears.
    service
        .set_task_status(
            farm_id,
            TaskType::Seed,
            date(2024, 5, 10),
            Some(recipe.id),
            None,
            None,
            Some(CompletionStatus::Completed),
            Some(2),
        )
        .await
        .unwrap();
    let daily_after = service.daily_tasks(farm_id, date(2024, 5, 10)).await.unwrap();
    assert!(daily_after
        .iter()
        .all(|t| t.action != "Sow soaked seed (expiring)"));
}

#[tokio::test]
async fn maintenance_chores_land_on_their_weekday_without_merging() {
    let db = test_db().await;
    let (events, _rx) = test_events();
    let farm_id = Uuid::new_v4();

    insert_maintenance_task(&db, farm_id, "Sanitize racks", 2).await;
    insert_maintenance_task(&db, farm_id, "Rotate seed stock", 2).await;

    let service = TaskService::new(db.clone(), events);
    let monday = date(2024, 5, 6);
    let week = service.weekly_tasks(farm_id, date(2024, 5, 8)).await.unwrap();
    assert_eq!(week.week_start, monday);

    let wednesday = date(2024, 5, 8);
    let chores: Vec<_> = week
        .tasks
        .iter()
        .filter(|t| t.date == wednesday && !t.urgent)
        .collect();
    assert_eq!(chores.len(), 2, "both chores stay distinct tasks");

    // Completing one chore leaves the other pending.
    service
        .set_task_status(
            farm_id,
            TaskType::Maintenance,
            wednesday,
            None,
            None,
            Some("Sanitize racks".to_string()),
            Some(CompletionStatus::Completed),
            None,
        )
        .await
        .unwrap();
    let week_after = service.weekly_tasks(farm_id, monday).await.unwrap();
    let sanitize = week_after
        .tasks
        .iter()
        .find(|t| t.action == "Sanitize racks")
        .unwrap();
    let rotate = week_after
        .tasks
        .iter()
        .find(|t| t.action == "Rotate seed stock")
        .unwrap();
    assert_eq!(sanitize.status, TaskStatus::Completed);
    assert_eq!(rotate.status, TaskStatus::Pending);
}
