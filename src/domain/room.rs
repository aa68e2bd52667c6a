//! Room record and the read-only projections derived from it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{PlayerId, Resources, RoomId};

/// Number of players a room holds when full.
pub const ROOM_CAPACITY: usize = 2;

/// A pairing context for up to two players.
///
/// Only [`super::RoomRegistry`] mutates rooms; everything outside the
/// registry sees them through shared references or the projections below.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    players: Vec<PlayerId>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    resources: HashMap<PlayerId, Resources>,
}

impl Room {
    pub(super) fn new(id: RoomId) -> Self {
        Self {
            id,
            players: Vec::with_capacity(ROOM_CAPACITY),
            created_at: Utc::now(),
            started_at: None,
            resources: HashMap::with_capacity(ROOM_CAPACITY),
        }
    }

    /// Room identifier.
    #[must_use]
    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Members in join order.
    #[must_use]
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the second player has ever joined.
    #[must_use]
    pub const fn started(&self) -> bool {
        self.started_at.is_some()
    }

    /// When the room became started, if it has.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns `true` if the room holds [`ROOM_CAPACITY`] players.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.players.len() >= ROOM_CAPACITY
    }

    /// Returns `true` if `player` is a member.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }

    /// Stored vector for `player`, if they are a member.
    #[must_use]
    pub fn resources_of(&self, player: PlayerId) -> Option<Resources> {
        self.resources.get(&player).copied()
    }

    /// First member that is not `viewer`.
    #[must_use]
    pub fn opponent_of(&self, viewer: PlayerId) -> Option<PlayerId> {
        self.players.iter().copied().find(|p| *p != viewer)
    }

    /// Members other than `player`, in join order.
    #[must_use]
    pub fn others(&self, player: PlayerId) -> Vec<PlayerId> {
        self.players
            .iter()
            .copied()
            .filter(|p| *p != player)
            .collect()
    }

    pub(super) fn add_player(&mut self, player: PlayerId) -> bool {
        self.players.push(player);
        self.resources.insert(player, Resources::ZERO);
        if self.players.len() == ROOM_CAPACITY && self.started_at.is_none() {
            self.started_at = Some(Utc::now());
            return true;
        }
        false
    }

    pub(super) fn remove_player(&mut self, player: PlayerId) {
        self.players.retain(|p| *p != player);
        self.resources.remove(&player);
    }

    pub(super) fn set_resources(&mut self, player: PlayerId, resources: Resources) {
        if let Some(slot) = self.resources.get_mut(&player) {
            *slot = resources;
        }
    }

    pub(super) fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    #[cfg(test)]
    pub(super) fn resource_keys_match_players(&self) -> bool {
        self.resources.len() == self.players.len()
            && self.players.iter().all(|p| self.resources.contains_key(p))
    }
}

/// Listing entry for discovery endpoints. Never carries resources.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSummary {
    /// Room identifier.
    pub room_id: RoomId,
    /// Current number of members.
    pub player_count: usize,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&Room> for RoomSummary {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id.clone(),
            player_count: room.players.len(),
            created_at: room.created_at,
        }
    }
}

/// Public details of a single room. Never carries resources.
#[derive(Debug, Clone, Serialize)]
pub struct RoomDetail {
    /// Room identifier.
    pub room_id: RoomId,
    /// Members in join order.
    pub players: Vec<PlayerId>,
    /// Current number of members.
    pub player_count: usize,
    /// Whether the room has started.
    pub started: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// When the room started, if it has.
    pub started_at: Option<DateTime<Utc>>,
}

impl From<&Room> for RoomDetail {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id.clone(),
            players: room.players.clone(),
            player_count: room.players.len(),
            started: room.started(),
            created_at: room.created_at,
            started_at: room.started_at,
        }
    }
}

/// Full game state of a room: every member and every vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    /// Members in join order.
    pub players: Vec<PlayerId>,
    /// Vector of each member.
    pub resources: HashMap<PlayerId, Resources>,
}

impl From<&Room> for GameState {
    fn from(room: &Room) -> Self {
        Self {
            players: room.players.clone(),
            resources: room.resources.clone(),
        }
    }
}

/// Game state as seen by one member: only the opponent's vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    /// Members in join order.
    pub players: Vec<PlayerId>,
    /// Opponent's vector, or all zeros while there is no opponent.
    pub opponent_resources: Resources,
    /// Room identifier.
    pub room_id: RoomId,
}

impl PlayerView {
    pub(super) fn of(room: &Room, viewer: PlayerId) -> Self {
        let opponent_resources = room
            .opponent_of(viewer)
            .and_then(|opponent| room.resources_of(opponent))
            .unwrap_or(Resources::ZERO);
        Self {
            players: room.players.clone(),
            opponent_resources,
            room_id: room.id.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn room() -> Room {
        Room::new(RoomId::parse("ABCD"))
    }

    #[test]
    fn new_room_is_empty_and_unstarted() {
        let room = room();
        assert!(room.is_empty());
        assert!(!room.started());
        assert!(room.started_at().is_none());
        assert!(room.resource_keys_match_players());
    }

    #[test]
    fn second_player_starts_room() {
        let mut room = room();
        assert!(!room.add_player(PlayerId::new()));
        assert!(room.add_player(PlayerId::new()));
        assert!(room.started());
        assert!(room.is_full());
    }

    #[test]
    fn started_survives_departure() {
        let mut room = room();
        let p1 = PlayerId::new();
        let p2 = PlayerId::new();
        room.add_player(p1);
        room.add_player(p2);
        let stamp = room.started_at();
        room.remove_player(p2);
        assert!(room.started());
        assert_eq!(room.started_at(), stamp);
        // A later second join does not restamp.
        assert!(!room.add_player(PlayerId::new()));
        assert_eq!(room.started_at(), stamp);
    }

    #[test]
    fn remove_player_drops_resources() {
        let mut room = room();
        let p1 = PlayerId::new();
        room.add_player(p1);
        assert_eq!(room.resources_of(p1), Some(Resources::ZERO));
        room.remove_player(p1);
        assert_eq!(room.resources_of(p1), None);
        assert!(room.resource_keys_match_players());
    }

    #[test]
    fn opponent_and_others() {
        let mut room = room();
        let p1 = PlayerId::new();
        let p2 = PlayerId::new();
        room.add_player(p1);
        assert_eq!(room.opponent_of(p1), None);
        room.add_player(p2);
        assert_eq!(room.opponent_of(p1), Some(p2));
        assert_eq!(room.others(p2), vec![p1]);
    }

    #[test]
    fn summary_hides_resources() {
        let mut room = room();
        room.add_player(PlayerId::new());
        let summary = RoomSummary::from(&room);
        assert_eq!(summary.player_count, 1);
        let json = serde_json::to_string(&summary).unwrap_or_default();
        assert!(!json.contains("resources"));
    }
}
