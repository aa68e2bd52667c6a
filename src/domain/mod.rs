//! Domain layer: identifiers, rooms, the room registry, and events.
//!
//! This module contains the in-memory room model. [`RoomRegistry`] owns
//! every [`Room`] and enforces capacity, membership, and resource bounds;
//! [`EventBus`] carries the resulting [`RoomEvent`]s to connections.

pub mod error;
pub mod event_bus;
pub mod player_id;
pub mod resources;
pub mod room;
pub mod room_event;
pub mod room_id;
pub mod room_registry;

pub use error::RoomError;
pub use event_bus::EventBus;
pub use player_id::PlayerId;
pub use resources::{RESOURCE_MAX, RESOURCE_MIN, RESOURCE_SLOTS, Resources};
pub use room::{GameState, PlayerView, ROOM_CAPACITY, Room, RoomDetail, RoomSummary};
pub use room_event::RoomEvent;
pub use room_id::RoomId;
pub use room_registry::{JoinOutcome, LeaveOutcome, RoomRegistry};
