//! Failure taxonomy of the room registry.
//!
//! Every [`RoomError`] describes a rejected operation. A rejected operation
//! never leaves partial state behind.

use super::{PlayerId, RoomId};

/// Reasons a registry operation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// No live room has this identifier.
    #[error("room not found: {0}")]
    RoomNotFound(RoomId),

    /// The room already holds two players.
    #[error("room is full: {0}")]
    RoomFull(RoomId),

    /// The player is not a member of the room.
    #[error("player {player_id} is not in room {room_id}")]
    PlayerNotInRoom {
        /// Room the operation targeted.
        room_id: RoomId,
        /// Player that issued the operation.
        player_id: PlayerId,
    },

    /// The player already belongs to a different room.
    #[error("player {player_id} is already in room {room_id}")]
    PlayerInAnotherRoom {
        /// Player that attempted the join.
        player_id: PlayerId,
        /// Room the player currently belongs to.
        room_id: RoomId,
    },

    /// The submitted resource vector failed validation.
    #[error("invalid resources: {0}")]
    InvalidResources(String),
}
