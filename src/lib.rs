//! Trayline API Library
//!
//! Backend for microgreen farm operations: recipes, trays, seed inventory,
//! growth scheduling, and task generation.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod commands;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod queries;
pub mod reports;
pub mod scheduling;
pub mod services;

use axum::{extract::State, response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: services::AppServices,
}

// Common response wrapper
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

pub fn api_v1_routes() -> Router<AppState> {
    let recipes = Router::new()
        .route("/recipes", get(handlers::recipes::list_recipes))
        .route("/recipes/:id", get(handlers::recipes::get_recipe))
        .route("/varieties", get(handlers::customers::list_varieties));

    let customers = Router::new()
        .route("/customers", get(handlers::customers::list_customers))
        .route(
            "/standing-orders",
            get(handlers::customers::list_standing_orders),
        );

    let seed_batches = Router::new()
        .route(
            "/seed-batches",
            get(handlers::seed_batches::list_batches)
                .post(handlers::seed_batches::create_batch),
        )
        .route(
            "/seed-batches/match",
            get(handlers::seed_batches::match_batches),
        );

    let trays = Router::new()
        .route("/trays", get(handlers::trays::list_trays))
        .route("/trays/:id", get(handlers::trays::get_tray))
        .route(
            "/trays/:id/lost",
            axum::routing::post(handlers::trays::mark_lost),
        )
        .route(
            "/trays/:id/harvest",
            axum::routing::post(handlers::trays::record_harvest),
        )
        .route(
            "/trays/:tray_id/steps/:step_id/complete",
            axum::routing::post(handlers::trays::complete_step),
        );

    let seeding = Router::new()
        .route(
            "/tray-requests",
            get(handlers::seeding::list_pending_requests)
                .post(handlers::seeding::create_tray_request),
        )
        .route(
            "/tray-requests/:id/cancel",
            axum::routing::post(handlers::seeding::cancel_tray_request),
        )
        .route(
            "/tasks/fulfill-seed",
            axum::routing::post(handlers::seeding::fulfill_seed_task),
        );

    let tasks = Router::new()
        .route("/tasks/daily", get(handlers::tasks::daily_tasks))
        .route("/tasks/weekly", get(handlers::tasks::weekly_tasks))
        .route(
            "/tasks/status",
            axum::routing::put(handlers::tasks::set_task_status),
        );

    let reports = Router::new().route(
        "/reports/seeding-plan",
        get(handlers::reports::seeding_plan),
    );

    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .merge(recipes)
        .merge(customers)
        .merge(seed_batches)
        .merge(trays)
        .merge(seeding)
        .merge(tasks)
        .merge(reports)
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "service": "trayline-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}

// Note: scheduling and services both export a module named `tasks`, so the
// prelude re-exports names rather than globbing both.
pub mod prelude {
    pub use crate::db::*;
    pub use crate::errors::*;
    pub use crate::events::*;
    pub use crate::scheduling::{grow_days, resolve_lifecycle, week_start, TrayLifecycle};
    pub use crate::services::AppServices;
}
