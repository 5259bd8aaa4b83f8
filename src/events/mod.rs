use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::task_completion::TaskType;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Domain events emitted after successful state changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Seeding pipeline events
    TrayRequestCreated {
        request_id: Uuid,
        recipe_id: Uuid,
        quantity: i32,
        sow_date: NaiveDate,
    },
    TrayRequestCancelled(Uuid),
    SeedTaskFulfilled {
        recipe_id: Uuid,
        batch_id: Uuid,
        quantity: i32,
        sow_date: NaiveDate,
    },
    RecipeCopiedFromTemplate {
        template_id: Uuid,
        farm_recipe_id: Uuid,
    },

    // Tray lifecycle events
    TrayStepCompleted {
        tray_id: Uuid,
        step_id: Uuid,
        skipped: bool,
    },
    TrayLost {
        tray_id: Uuid,
        reason: Option<String>,
    },
    TrayHarvested {
        tray_id: Uuid,
        harvest_date: NaiveDate,
    },

    // Task ledger events
    TaskStatusChanged {
        task_type: TaskType,
        task_date: NaiveDate,
        recipe_id: Option<Uuid>,
        status: String,
    },

    // Inventory events
    SeedBatchCreated(Uuid),
}

/// Drains the event channel, logging each event. Downstream consumers
/// (notification delivery, sync to the hosted backend) attach here.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        match &event {
            Event::SeedTaskFulfilled {
                recipe_id,
                quantity,
                sow_date,
                ..
            } => {
                info!(%recipe_id, quantity, %sow_date, "seed task fulfilled");
            }
            Event::TrayLost { tray_id, reason } => {
                warn!(%tray_id, ?reason, "tray marked lost");
            }
            other => info!(event = ?other, "event processed"),
        }
    }
    info!("event channel closed, processor exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);
        sender
            .send(Event::TrayRequestCancelled(Uuid::new_v4()))
            .await
            .expect("send should succeed");
        assert!(matches!(
            rx.recv().await,
            Some(Event::TrayRequestCancelled(_))
        ));
    }

    #[tokio::test]
    async fn send_fails_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        let result = sender.send(Event::SeedBatchCreated(Uuid::new_v4())).await;
        assert!(result.is_err());
    }
}
