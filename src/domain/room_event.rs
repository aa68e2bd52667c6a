//! Events fanned out to room members.
//!
//! Every [`RoomEvent`] is addressed to exactly one player. The service
//! publishes one event per recipient so each member receives a projection
//! scoped to itself and never its own vector echoed back.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::room::PlayerView;
use super::{PlayerId, Resources, RoomId};

/// Domain event emitted after a room mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum RoomEvent {
    /// Another player joined the recipient's room.
    PlayerJoined {
        /// Room identifier.
        room_id: RoomId,
        /// Player the event is delivered to.
        #[serde(skip)]
        recipient: PlayerId,
        /// Handle of the newcomer.
        player_id: PlayerId,
        /// Whether the room is now started.
        started: bool,
        /// Room state from the recipient's point of view.
        game_state: PlayerView,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The room reached two players.
    GameStarted {
        /// Room identifier.
        room_id: RoomId,
        /// Player the event is delivered to.
        #[serde(skip)]
        recipient: PlayerId,
        /// Members in join order.
        players: Vec<PlayerId>,
        /// Room state from the recipient's point of view.
        game_state: PlayerView,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The recipient's opponent stored a new resource vector.
    ResourcesUpdated {
        /// Room identifier.
        room_id: RoomId,
        /// Player the event is delivered to.
        #[serde(skip)]
        recipient: PlayerId,
        /// Player whose vector changed.
        player_id: PlayerId,
        /// The new vector.
        resources: Resources,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A member left or disconnected.
    PlayerLeft {
        /// Room identifier.
        room_id: RoomId,
        /// Player the event is delivered to.
        #[serde(skip)]
        recipient: PlayerId,
        /// Handle of the departed player.
        player_id: PlayerId,
        /// Members still in the room.
        players: Vec<PlayerId>,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl RoomEvent {
    /// Returns the room this event concerns.
    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        match self {
            Self::PlayerJoined { room_id, .. }
            | Self::GameStarted { room_id, .. }
            | Self::ResourcesUpdated { room_id, .. }
            | Self::PlayerLeft { room_id, .. } => room_id,
        }
    }

    /// Returns the player this event is addressed to.
    #[must_use]
    pub fn recipient(&self) -> PlayerId {
        match self {
            Self::PlayerJoined { recipient, .. }
            | Self::GameStarted { recipient, .. }
            | Self::ResourcesUpdated { recipient, .. }
            | Self::PlayerLeft { recipient, .. } => *recipient,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::PlayerJoined { .. } => "player_joined",
            Self::GameStarted { .. } => "game_started",
            Self::ResourcesUpdated { .. } => "resources_updated",
            Self::PlayerLeft { .. } => "player_left",
        }
    }
}
