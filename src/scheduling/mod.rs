//! The growth scheduling engine: pure logic over queried state.
//!
//! Everything in this module is a function of its inputs — no database
//! access, no clocks. Services load rows, call in here, and persist the
//! results.

pub mod duration;
pub mod lifecycle;
pub mod planting;
pub mod tasks;

pub use duration::grow_days;
pub use lifecycle::{resolve_lifecycle, TrayLifecycle};
pub use planting::{week_start, PlantingContext, ScheduleEntry};
pub use tasks::{TaskItem, TaskKey, TaskStatus};
