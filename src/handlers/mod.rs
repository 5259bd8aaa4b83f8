pub mod customers;
pub mod recipes;
pub mod reports;
pub mod seed_batches;
pub mod seeding;
pub mod tasks;
pub mod trays;
