pub mod customers;
pub mod recipes;
pub mod reports;
pub mod seed_batches;
pub mod seeding;
pub mod tasks;
pub mod trays;

use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;

/// Aggregated services shared with the HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub customers: Arc<customers::CustomerService>,
    pub recipes: Arc<recipes::RecipeService>,
    pub seed_batches: Arc<seed_batches::SeedBatchService>,
    pub trays: Arc<trays::TrayService>,
    pub seeding: Arc<seeding::SeedingService>,
    pub tasks: Arc<tasks::TaskService>,
    pub reports: Arc<reports::ReportService>,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            customers: Arc::new(customers::CustomerService::new(db.clone())),
            recipes: Arc::new(recipes::RecipeService::new(db.clone())),
            seed_batches: Arc::new(seed_batches::SeedBatchService::new(
                db.clone(),
                event_sender.clone(),
            )),
            trays: Arc::new(trays::TrayService::new(db.clone(), event_sender.clone())),
            seeding: Arc::new(seeding::SeedingService::new(
                db.clone(),
                event_sender.clone(),
            )),
            tasks: Arc::new(tasks::TaskService::new(db.clone(), event_sender)),
            reports: Arc::new(reports::ReportService::new(db)),
        }
    }
}
