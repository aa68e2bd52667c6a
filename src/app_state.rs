//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::RoomService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Room service for all business logic.
    pub room_service: Arc<RoomService>,
    /// Event bus for WebSocket fan-out.
    pub event_bus: EventBus,
}

impl AppState {
    /// Builds the state around an already constructed service, sharing its
    /// event bus.
    #[must_use]
    pub fn new(room_service: Arc<RoomService>) -> Self {
        let event_bus = room_service.event_bus().clone();
        Self {
            room_service,
            event_bus,
        }
    }
}
