//! Destroyed-ship event log

use crate::error::{ServiceError, ServiceResult};
use crate::model::DestroyedShipEvent;
use crate::validation::ShipDestruction;
use game_store::{Collection, DocumentId, Stored};
use std::sync::Arc;

/// Append-only log of destroyed ships, keyed by owner address
#[derive(Clone)]
pub struct DestroyedShipLog {
    events: Arc<dyn Collection<DestroyedShipEvent>>,
}

impl DestroyedShipLog {
    pub fn new(events: Arc<dyn Collection<DestroyedShipEvent>>) -> Self {
        Self { events }
    }

    /// Append one event; repeated calls append repeated events
    pub fn record(&self, destruction: ShipDestruction) -> ServiceResult<DocumentId> {
        let event = DestroyedShipEvent {
            address: destruction.address,
            ship_id: destruction.ship_id,
        };
        let address = event.address.clone();
        let ship_id = event.ship_id;

        match self.events.insert(event) {
            Ok(id) => {
                tracing::info!("Ship {} of {} destroyed", ship_id, address);
                Ok(id)
            }
            Err(e) => {
                tracing::error!("Failed to record destroyed ship {} of {}: {}", ship_id, address, e);
                Err(ServiceError::Internal(e.to_string()))
            }
        }
    }

    /// Every event for `address`, in the order they were recorded
    pub fn list(&self, address: &str) -> ServiceResult<Vec<Stored<DestroyedShipEvent>>> {
        self.events
            .find(&|e: &DestroyedShipEvent| e.address == address)
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }
}
