//! Service layer: gateway contract orchestration.
//!
//! [`RoomService`] serializes access to the room registry, maps registry
//! outcomes to gateway results, and emits events through the
//! [`super::domain::EventBus`].

pub mod room_service;

pub use room_service::{JoinAck, RoomService};
