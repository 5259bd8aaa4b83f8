#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use tokio::sync::mpsc;
use uuid::Uuid;

use trayline_api::entities::recipe_step::DurationUnit;
use trayline_api::entities::{
    maintenance_task, recipe, recipe_step, seed_batch, standing_order, standing_order_line,
    variety,
};
use trayline_api::events::{Event, EventSender};
use trayline_api::migrator::Migrator;

/// Fresh in-memory SQLite with the full schema. A single pooled connection
/// keeps the in-memory database alive and shared for the test's duration.
pub async fn test_db() -> Arc<DatabaseConnection> {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.expect("connect test db");
    Migrator::up(&db, None).await.expect("run migrations");
    Arc::new(db)
}

/// Event channel for command execution. Keep the receiver alive for the
/// test's duration or sends will fail.
pub fn test_events() -> (Arc<EventSender>, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(256);
    (Arc::new(EventSender::new(tx)), rx)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub async fn insert_variety(
    db: &DatabaseConnection,
    name: &str,
    seed_per_tray: Option<Decimal>,
    seed_unit: variety::SeedUnit,
) -> variety::Model {
    variety::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        seed_per_tray: Set(seed_per_tray),
        seed_unit: Set(seed_unit),
    }
    .insert(db)
    .await
    .expect("insert variety")
}

pub struct RecipeSpec<'a> {
    pub farm_id: Option<Uuid>,
    pub name: &'a str,
    pub variety_id: Option<Uuid>,
    pub requires_soak: bool,
    pub lead_time_days: i32,
    /// (sequence, description, duration_value, unit)
    pub steps: Vec<(i32, &'a str, i32, DurationUnit)>,
}

pub async fn insert_recipe(
    db: &DatabaseConnection,
    spec: RecipeSpec<'_>,
) -> (recipe::Model, Vec<recipe_step::Model>) {
    let now = Utc::now();
    let recipe = recipe::ActiveModel {
        id: Set(Uuid::new_v4()),
        farm_id: Set(spec.farm_id),
        source_recipe_id: Set(None),
        name: Set(spec.name.to_string()),
        variety_id: Set(spec.variety_id),
        requires_soak: Set(spec.requires_soak),
        soak_hours: Set(spec.requires_soak.then_some(12)),
        lead_time_days: Set(spec.lead_time_days),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert recipe");

    let mut steps = Vec::new();
    for (sequence, description, value, unit) in spec.steps {
        let step = recipe_step::ActiveModel {
            id: Set(Uuid::new_v4()),
            recipe_id: Set(recipe.id),
            sequence: Set(sequence),
            description: Set(description.to_string()),
            duration_value: Set(value),
            duration_unit: Set(unit),
        }
        .insert(db)
        .await
        .expect("insert step");
        steps.push(step);
    }

    (recipe, steps)
}

pub async fn insert_batch(
    db: &DatabaseConnection,
    farm_id: Uuid,
    variety_id: Uuid,
    lot_code: &str,
    remaining_grams: Decimal,
    purchase_date: NaiveDate,
) -> seed_batch::Model {
    let now = Utc::now();
    seed_batch::ActiveModel {
        id: Set(Uuid::new_v4()),
        farm_id: Set(farm_id),
        variety_id: Set(variety_id),
        lot_code: Set(lot_code.to_string()),
        remaining_grams: Set(remaining_grams),
        purchase_date: Set(purchase_date),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert batch")
}

pub async fn insert_standing_order(
    db: &DatabaseConnection,
    farm_id: Uuid,
    customer_id: Uuid,
    delivery_weekday: i32,
    lines: Vec<(Uuid, Decimal)>,
) -> standing_order::Model {
    let order = standing_order::ActiveModel {
        id: Set(Uuid::new_v4()),
        farm_id: Set(farm_id),
        customer_id: Set(customer_id),
        delivery_weekday: Set(delivery_weekday),
        active: Set(true),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("insert standing order");

    for (recipe_id, tray_count) in lines {
        standing_order_line::ActiveModel {
            id: Set(Uuid::new_v4()),
            standing_order_id: Set(order.id),
            recipe_id: Set(recipe_id),
            product_name: Set(None),
            tray_count: Set(tray_count),
        }
        .insert(db)
        .await
        .expect("insert order line");
    }

    order
}

pub async fn insert_tray(
    db: &DatabaseConnection,
    farm_id: Uuid,
    recipe_id: Uuid,
    sow_date: NaiveDate,
) -> trayline_api::entities::tray::Model {
    use trayline_api::entities::tray;
    let now = Utc::now();
    tray::ActiveModel {
        id: Set(Uuid::new_v4()),
        farm_id: Set(farm_id),
        recipe_id: Set(recipe_id),
        batch_id: Set(None),
        customer_id: Set(None),
        sow_date: Set(sow_date),
        harvest_date: Set(None),
        yield_grams: Set(None),
        status: Set(tray::TrayStatus::Active),
        loss_reason: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert tray")
}

pub async fn insert_tray_step(
    db: &DatabaseConnection,
    tray_id: Uuid,
    description: &str,
    sequence: i32,
    scheduled_date: NaiveDate,
) -> trayline_api::entities::tray_step::Model {
    use trayline_api::entities::tray_step;
    tray_step::ActiveModel {
        id: Set(Uuid::new_v4()),
        tray_id: Set(tray_id),
        step_description: Set(description.to_string()),
        sequence: Set(sequence),
        scheduled_date: Set(scheduled_date),
        status: Set(tray_step::TrayStepStatus::Pending),
        completed_at: Set(None),
    }
    .insert(db)
    .await
    .expect("insert tray step")
}

pub async fn insert_maintenance_task(
    db: &DatabaseConnection,
    farm_id: Uuid,
    description: &str,
    weekday: i32,
) -> maintenance_task::Model {
    maintenance_task::ActiveModel {
        id: Set(Uuid::new_v4()),
        farm_id: Set(farm_id),
        description: Set(description.to_string()),
        weekday: Set(weekday),
        active: Set(true),
    }
    .insert(db)
    .await
    .expect("insert maintenance task")
}

