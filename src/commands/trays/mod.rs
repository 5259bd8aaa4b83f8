pub mod complete_tray_step_command;
pub mod mark_tray_lost_command;
pub mod record_harvest_command;

pub use complete_tray_step_command::CompleteTrayStepCommand;
pub use mark_tray_lost_command::MarkTrayLostCommand;
pub use record_harvest_command::RecordHarvestCommand;

use sea_orm::{ConnectionTrait, EntityTrait};
use uuid::Uuid;

use crate::entities::tray;
use crate::errors::ServiceError;

/// Loads a farm's tray or fails with NotFound. Lost trays are terminal;
/// callers that mutate must additionally reject them.
pub(crate) async fn load_tray<C: ConnectionTrait>(
    db: &C,
    farm_id: Uuid,
    tray_id: Uuid,
) -> Result<tray::Model, ServiceError> {
    tray::Entity::find_by_id(tray_id)
        .one(db)
        .await?
        .filter(|t| t.farm_id == farm_id)
        .ok_or_else(|| ServiceError::NotFound(format!("Tray {} not found", tray_id)))
}
