mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use uuid::Uuid;

use common::*;
use trayline_api::entities::recipe_step::DurationUnit;
use trayline_api::entities::variety::SeedUnit;
use trayline_api::errors::ServiceError;
use trayline_api::scheduling::TrayLifecycle;
use trayline_api::services::trays::TrayService;

#[tokio::test]
async fn lifecycle_is_derived_from_steps_and_flags() {
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

    let sow = date(2024, 5, 1);
    let tray = insert_tray(&db, farm_id, recipe.id, sow).await;
    let blackout = insert_tray_step(&db, tray.id, "Blackout", 1, date(2024, 5, 1)).await;
    insert_tray_step(&db, tray.id, "Uncover", 2, date(2024, 5, 4)).await;

    let service = TrayService::new(db.clone(), events);

    // Earliest pending step names the stage; harvest projects sow + 7.
    let detail = service.get_tray(farm_id, tray.id).await.unwrap();
    assert_eq!(detail.lifecycle, TrayLifecycle::Stage("Blackout".into()));
    assert_eq!(detail.projected_harvest, date(2024, 5, 8));

    // Completing the first step advances the stage.
    service
        .complete_step(farm_id, tray.id, blackout.id, false)
        .await
        .unwrap();
    let detail = service.get_tray(farm_id, tray.id).await.unwrap();
    assert_eq!(detail.lifecycle, TrayLifecycle::Stage("Uncover".into()));

    // Recording a harvest is terminal (short of loss).
    service
        .record_harvest(farm_id, tray.id, date(2024, 5, 8), Some(dec!(310)))
        .await
        .unwrap();
    let detail = service.get_tray(farm_id, tray.id).await.unwrap();
    assert_eq!(detail.lifecycle, TrayLifecycle::Harvested);
}

#[tokio::test]
async fn lost_wins_over_everything_and_blocks_further_work() {
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
            steps: vec![(1, "Blackout", 3, DurationUnit::Day)],
        },
    )
    .await;

    let tray = insert_tray(&db, farm_id, recipe.id, date(2024, 5, 1)).await;
    let step = insert_tray_step(&db, tray.id, "Blackout", 1, date(2024, 5, 2)).await;

    let service = TrayService::new(db.clone(), events);
    service
        .mark_lost(farm_id, tray.id, Some("Mold".to_string()))
        .await
        .unwrap();

    // A lost tray with a pending step still reads Lost.
    let detail = service.get_tray(farm_id, tray.id).await.unwrap();
    assert_eq!(detail.lifecycle, TrayLifecycle::Lost);

    // Terminal: no step work, no harvest, no second loss.
    assert_matches!(
        service.complete_step(farm_id, tray.id, step.id, false).await,
        Err(ServiceError::InvalidOperation(_))
    );
    assert_matches!(
        service
            .record_harvest(farm_id, tray.id, date(2024, 5, 8), None)
            .await,
        Err(ServiceError::InvalidOperation(_))
    );
    assert_matches!(
        service.mark_lost(farm_id, tray.id, None).await,
        Err(ServiceError::Conflict(_))
    );
}

#[tokio::test]
async fn completed_recipe_without_terminal_flag_reads_growing() {
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
            steps: vec![(1, "Blackout", 3, DurationUnit::Day)],
        },
    )
    .await;

    let tray = insert_tray(&db, farm_id, recipe.id, date(2024, 5, 1)).await;
    let step = insert_tray_step(&db, tray.id, "Blackout", 1, date(2024, 5, 2)).await;

    let service = TrayService::new(db.clone(), events);
    service
        .complete_step(farm_id, tray.id, step.id, true)
        .await
        .unwrap();

    let detail = service.get_tray(farm_id, tray.id).await.unwrap();
    assert_eq!(detail.lifecycle, TrayLifecycle::Growing);

    // Re-resolving an already-resolved step is rejected.
    assert_matches!(
        service.complete_step(farm_id, tray.id, step.id, false).await,
        Err(ServiceError::Conflict(_))
    );
}
