//! In-memory store of live rooms.
//!
//! [`RoomRegistry`] is the sole owner and mutator of [`Room`] records. It is
//! a plain synchronous data structure: callers that share it across tasks
//! wrap the whole registry in one lock (see [`crate::service::RoomService`]),
//! so every operation below is atomic with respect to every other.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::room::{GameState, PlayerView, Room, RoomSummary};
use super::{PlayerId, Resources, RoomError, RoomId};

/// Collision retries at one identifier length before widening.
const ID_ATTEMPTS_PER_LENGTH: usize = 32;

/// Result of a successful [`RoomRegistry::join_room`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The player was added.
    Joined {
        /// `true` if this join made the room start.
        started_now: bool,
    },
    /// The player was already a member; nothing changed.
    AlreadyMember,
}

/// Result of a successful [`RoomRegistry::leave_room`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The player was not a member; nothing changed.
    NotMember,
    /// The player was removed and the room still has members.
    Left,
    /// The player was the last member and the room was deleted.
    RoomRemoved,
}

/// Central store for all live rooms.
///
/// Keeps a secondary index from player to room so that disconnect cleanup
/// never has to scan every room.
#[derive(Debug)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
    player_rooms: HashMap<PlayerId, RoomId>,
    id_length: usize,
}

impl RoomRegistry {
    /// Creates an empty registry issuing identifiers of `id_length`
    /// characters (clamped to [`RoomId::MIN_LEN`]..=[`RoomId::MAX_LEN`]).
    #[must_use]
    pub fn new(id_length: usize) -> Self {
        Self {
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
            id_length: id_length.clamp(RoomId::MIN_LEN, RoomId::MAX_LEN),
        }
    }

    /// Creates an empty, unstarted room under a fresh identifier.
    pub fn create_room(&mut self) -> &Room {
        let id = self.fresh_room_id_with(&mut RoomId::generate);
        tracing::info!(room_id = %id, "room created");
        self.rooms.entry(id.clone()).or_insert_with(|| Room::new(id))
    }

    /// Looks up a room.
    #[must_use]
    pub fn get_room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    /// Summaries of all live rooms, oldest first.
    #[must_use]
    pub fn list_rooms(&self) -> Vec<RoomSummary> {
        let mut summaries: Vec<RoomSummary> = self.rooms.values().map(RoomSummary::from).collect();
        summaries.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.room_id.cmp(&b.room_id))
        });
        summaries
    }

    /// Returns `true` if the room exists and holds two players.
    #[must_use]
    pub fn is_room_full(&self, id: &RoomId) -> bool {
        self.rooms.get(id).is_some_and(Room::is_full)
    }

    /// Adds `player` to a room, enforcing capacity in the same step.
    ///
    /// # Errors
    ///
    /// - [`RoomError::RoomNotFound`] if the room does not exist.
    /// - [`RoomError::PlayerInAnotherRoom`] if the player is a member of a
    ///   different room.
    /// - [`RoomError::RoomFull`] if the room already holds two players.
    pub fn join_room(&mut self, id: &RoomId, player: PlayerId) -> Result<JoinOutcome, RoomError> {
        let room = self
            .rooms
            .get_mut(id)
            .ok_or_else(|| RoomError::RoomNotFound(id.clone()))?;

        if room.contains(player) {
            return Ok(JoinOutcome::AlreadyMember);
        }
        if let Some(current) = self.player_rooms.get(&player) {
            return Err(RoomError::PlayerInAnotherRoom {
                player_id: player,
                room_id: current.clone(),
            });
        }
        if room.is_full() {
            return Err(RoomError::RoomFull(id.clone()));
        }

        let started_now = room.add_player(player);
        self.player_rooms.insert(player, id.clone());
        tracing::info!(
            room_id = %id,
            player_id = %player,
            players = room.players().len(),
            started_now,
            "player joined room"
        );
        Ok(JoinOutcome::Joined { started_now })
    }

    /// Removes `player` from a room, deleting the room once it is empty.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::RoomNotFound`] if the room does not exist.
    pub fn leave_room(&mut self, id: &RoomId, player: PlayerId) -> Result<LeaveOutcome, RoomError> {
        let room = self
            .rooms
            .get_mut(id)
            .ok_or_else(|| RoomError::RoomNotFound(id.clone()))?;

        if !room.contains(player) {
            return Ok(LeaveOutcome::NotMember);
        }

        room.remove_player(player);
        self.player_rooms.remove(&player);
        tracing::info!(room_id = %id, player_id = %player, "player left room");

        if room.is_empty() {
            self.rooms.remove(id);
            tracing::info!(room_id = %id, "room removed (empty)");
            return Ok(LeaveOutcome::RoomRemoved);
        }
        Ok(LeaveOutcome::Left)
    }

    /// Removes `player` from whichever room holds them.
    ///
    /// Returns the room that was left and how, or `None` if the player was
    /// not in any room.
    pub fn leave_all_rooms(&mut self, player: PlayerId) -> Option<(RoomId, LeaveOutcome)> {
        let id = self.player_rooms.get(&player)?.clone();
        match self.leave_room(&id, player) {
            Ok(outcome) => Some((id, outcome)),
            Err(_) => {
                // Index pointed at a vanished room; drop the stale entry.
                self.player_rooms.remove(&player);
                None
            }
        }
    }

    /// Room the player currently belongs to.
    #[must_use]
    pub fn room_of(&self, player: PlayerId) -> Option<&RoomId> {
        self.player_rooms.get(&player)
    }

    /// Replaces the stored vector of `player`.
    ///
    /// # Errors
    ///
    /// - [`RoomError::RoomNotFound`] if the room does not exist.
    /// - [`RoomError::PlayerNotInRoom`] if the player is not a member.
    pub fn update_resources(
        &mut self,
        id: &RoomId,
        player: PlayerId,
        resources: Resources,
    ) -> Result<(), RoomError> {
        let room = self
            .rooms
            .get_mut(id)
            .ok_or_else(|| RoomError::RoomNotFound(id.clone()))?;
        if !room.contains(player) {
            return Err(RoomError::PlayerNotInRoom {
                room_id: id.clone(),
                player_id: player,
            });
        }
        room.set_resources(player, resources);
        Ok(())
    }

    /// Stored vector of `player` in a room.
    #[must_use]
    pub fn get_resources(&self, id: &RoomId, player: PlayerId) -> Option<Resources> {
        self.rooms.get(id)?.resources_of(player)
    }

    /// Full state of a room, both vectors included.
    #[must_use]
    pub fn room_state(&self, id: &RoomId) -> Option<GameState> {
        self.rooms.get(id).map(GameState::from)
    }

    /// State of a room as seen by one of its members.
    ///
    /// Returns `None` if the room does not exist or `player` is not in it.
    #[must_use]
    pub fn state_for_player(&self, id: &RoomId, player: PlayerId) -> Option<PlayerView> {
        let room = self.rooms.get(id)?;
        room.contains(player).then(|| PlayerView::of(room, player))
    }

    /// Removes rooms nobody has joined that were created at or before
    /// `cutoff`. Returns the removed identifiers.
    ///
    /// A room that has had members is deleted when its last member leaves,
    /// so every empty room seen here has never been joined.
    pub fn reap_empty_rooms(&mut self, cutoff: DateTime<Utc>) -> Vec<RoomId> {
        let stale: Vec<RoomId> = self
            .rooms
            .values()
            .filter(|room| room.is_empty() && room.created_at() <= cutoff)
            .map(|room| room.id().clone())
            .collect();
        for id in &stale {
            self.rooms.remove(id);
            tracing::info!(room_id = %id, "room reaped (never joined)");
        }
        stale
    }

    /// Number of live rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` if there are no live rooms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Draws identifiers from `generate` until one is unused. After
    /// [`ID_ATTEMPTS_PER_LENGTH`] collisions the requested length grows by
    /// one character, up to [`RoomId::MAX_LEN`].
    fn fresh_room_id_with(&self, generate: &mut impl FnMut(usize) -> RoomId) -> RoomId {
        let mut len = self.id_length;
        loop {
            for _ in 0..ID_ATTEMPTS_PER_LENGTH {
                let id = generate(len);
                if !self.rooms.contains_key(&id) {
                    return id;
                }
            }
            tracing::warn!(len, "room id space congested, widening");
            len = (len + 1).min(RoomId::MAX_LEN);
        }
    }

    /// Checks every structural invariant. Used by tests.
    #[cfg(test)]
    fn assert_consistent(&self) {
        let mut members = 0;
        for (id, room) in &self.rooms {
            assert_eq!(room.id(), id);
            assert!(room.players().len() <= super::room::ROOM_CAPACITY);
            assert!(room.resource_keys_match_players());
            for player in room.players() {
                assert_eq!(self.player_rooms.get(player), Some(id));
            }
            members += room.players().len();
        }
        assert_eq!(members, self.player_rooms.len());
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RoomId::MIN_LEN)
    }
}
