//! Room service: runs the gateway contract on top of the registry and
//! emits events.

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::domain::{
    EventBus, GameState, JoinOutcome, LeaveOutcome, PlayerId, PlayerView, ROOM_CAPACITY,
    Resources, RoomDetail, RoomError, RoomEvent, RoomId, RoomRegistry, RoomSummary,
};
use crate::error::GatewayError;

/// Acknowledgement returned to a player whose join succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct JoinAck {
    /// Room identifier.
    pub room_id: RoomId,
    /// Members in join order, the requester included.
    pub players: Vec<PlayerId>,
    /// Whether the room has started.
    pub started: bool,
    /// Room state from the requester's point of view.
    pub game_state: PlayerView,
}

/// Orchestration layer for all room operations.
///
/// Owns the [`RoomRegistry`] behind a single mutex and the [`EventBus`].
/// Every method follows the pattern: acquire lock → call registry → emit
/// events → release lock → return result. Because the lock covers the
/// whole method, the capacity check, the join-then-start transition, and
/// the resource update each appear atomic, and events leave in the same
/// order as the state changes they describe.
#[derive(Debug)]
pub struct RoomService {
    registry: Mutex<RoomRegistry>,
    event_bus: EventBus,
}

impl RoomService {
    /// Creates a new `RoomService` that takes ownership of `registry`.
    #[must_use]
    pub fn new(registry: RoomRegistry, event_bus: EventBus) -> Self {
        Self {
            registry: Mutex::new(registry),
            event_bus,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Creates an empty room.
    pub async fn create_room(&self) -> RoomDetail {
        let mut registry = self.registry.lock().await;
        RoomDetail::from(registry.create_room())
    }

    /// Summaries of live rooms, oldest first. With `open_only`, rooms that
    /// are already full are left out.
    pub async fn list_rooms(&self, open_only: bool) -> Vec<RoomSummary> {
        let registry = self.registry.lock().await;
        let mut rooms = registry.list_rooms();
        if open_only {
            rooms.retain(|room| room.player_count < ROOM_CAPACITY);
        }
        rooms
    }

    /// Number of live rooms.
    pub async fn room_count(&self) -> usize {
        self.registry.lock().await.len()
    }

    /// Public details of one room.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::RoomNotFound`] (wrapped) if the room does not
    /// exist.
    pub async fn get_room(&self, room_id: &RoomId) -> Result<RoomDetail, GatewayError> {
        let registry = self.registry.lock().await;
        registry
            .get_room(room_id)
            .map(RoomDetail::from)
            .ok_or_else(|| RoomError::RoomNotFound(room_id.clone()).into())
    }

    /// Full state of one room, both vectors included.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::RoomNotFound`] (wrapped) if the room does not
    /// exist.
    pub async fn room_state(&self, room_id: &RoomId) -> Result<GameState, GatewayError> {
        let registry = self.registry.lock().await;
        registry
            .room_state(room_id)
            .ok_or_else(|| RoomError::RoomNotFound(room_id.clone()).into())
    }

    /// State of a room as seen by `player`.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::RoomNotFound`] if the room does not exist or
    /// [`RoomError::PlayerNotInRoom`] if `player` is not a member.
    pub async fn state_for_player(
        &self,
        room_id: &RoomId,
        player: PlayerId,
    ) -> Result<PlayerView, GatewayError> {
        let registry = self.registry.lock().await;
        if registry.get_room(room_id).is_none() {
            return Err(RoomError::RoomNotFound(room_id.clone()).into());
        }
        registry.state_for_player(room_id, player).ok_or_else(|| {
            RoomError::PlayerNotInRoom {
                room_id: room_id.clone(),
                player_id: player,
            }
            .into()
        })
    }

    /// Current view of whichever room `player` belongs to, if any.
    pub async fn view_of(&self, player: PlayerId) -> Option<PlayerView> {
        let registry = self.registry.lock().await;
        let room_id = registry.room_of(player)?;
        registry.state_for_player(room_id, player)
    }

    /// Deletes rooms that nobody joined within `ttl` of their creation.
    /// Returns how many were removed.
    pub async fn reap_empty_rooms(&self, ttl: Duration) -> usize {
        let Some(cutoff) = TimeDelta::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_sub_signed(ttl))
        else {
            return 0;
        };
        let reaped = self.registry.lock().await.reap_empty_rooms(cutoff);
        if !reaped.is_empty() {
            tracing::debug!(count = reaped.len(), "reaped empty rooms");
        }
        reaped.len()
    }

    /// Joins `player` to a room and notifies the other member.
    ///
    /// The newcomer gets the returned [`JoinAck`]. Every other member gets
    /// a `player_joined` event, and when this join starts the room every
    /// member gets a `game_started` event. Re-joining as an existing member
    /// returns the acknowledgement again without emitting events.
    ///
    /// # Errors
    ///
    /// Returns the wrapped [`RoomError`] if the room does not exist, is
    /// full, or the player already belongs to another room.
    pub async fn join_room(
        &self,
        room_id: &RoomId,
        player: PlayerId,
    ) -> Result<JoinAck, GatewayError> {
        let mut registry = self.registry.lock().await;
        let outcome = registry.join_room(room_id, player).inspect_err(|err| {
            tracing::debug!(%room_id, player_id = %player, error = %err, "join rejected");
        })?;

        let room = registry
            .get_room(room_id)
            .ok_or_else(|| GatewayError::Internal(format!("room {room_id} vanished on join")))?;
        let game_state = registry
            .state_for_player(room_id, player)
            .ok_or_else(|| GatewayError::Internal(format!("player {player} missing on join")))?;

        if let JoinOutcome::Joined { started_now } = outcome {
            let timestamp = Utc::now();
            for recipient in room.others(player) {
                if let Some(view) = registry.state_for_player(room_id, recipient) {
                    let _ = self.event_bus.publish(RoomEvent::PlayerJoined {
                        room_id: room_id.clone(),
                        recipient,
                        player_id: player,
                        started: room.started(),
                        game_state: view,
                        timestamp,
                    });
                }
            }
            if started_now {
                for &recipient in room.players() {
                    if let Some(view) = registry.state_for_player(room_id, recipient) {
                        let _ = self.event_bus.publish(RoomEvent::GameStarted {
                            room_id: room_id.clone(),
                            recipient,
                            players: room.players().to_vec(),
                            game_state: view,
                            timestamp,
                        });
                    }
                }
                tracing::info!(%room_id, "game started");
            }
        }

        Ok(JoinAck {
            room_id: room_id.clone(),
            players: room.players().to_vec(),
            started: room.started(),
            game_state,
        })
    }

    /// Stores a new resource vector for `player` and relays it to the
    /// opponent. The sender does not get its own vector echoed back.
    ///
    /// # Errors
    ///
    /// - [`RoomError::RoomNotFound`] if the room does not exist.
    /// - [`GatewayError::GameNotStarted`] until the second player joins.
    /// - [`RoomError::InvalidResources`] if `raw` is not five integers in
    ///   range; the stored vector is left unchanged.
    /// - [`RoomError::PlayerNotInRoom`] if `player` is not a member.
    pub async fn update_resources(
        &self,
        room_id: &RoomId,
        player: PlayerId,
        raw: &serde_json::Value,
    ) -> Result<Resources, GatewayError> {
        let mut registry = self.registry.lock().await;
        let room = registry
            .get_room(room_id)
            .ok_or_else(|| RoomError::RoomNotFound(room_id.clone()))?;
        if !room.started() {
            return Err(GatewayError::GameNotStarted(room_id.clone()));
        }
        let recipients = room.others(player);

        let resources = Resources::from_json(raw).inspect_err(|err| {
            tracing::debug!(%room_id, player_id = %player, error = %err, "resources rejected");
        })?;
        registry.update_resources(room_id, player, resources)?;

        let timestamp = Utc::now();
        for recipient in recipients {
            let _ = self.event_bus.publish(RoomEvent::ResourcesUpdated {
                room_id: room_id.clone(),
                recipient,
                player_id: player,
                resources,
                timestamp,
            });
        }

        tracing::debug!(%room_id, player_id = %player, ?resources, "resources updated");
        Ok(resources)
    }

    /// Removes `player` from a room at their request.
    ///
    /// Leaving a room one is not in succeeds without effect.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::RoomNotFound`] (wrapped) if the room does not
    /// exist.
    pub async fn leave_room(
        &self,
        room_id: &RoomId,
        player: PlayerId,
    ) -> Result<LeaveOutcome, GatewayError> {
        let mut registry = self.registry.lock().await;
        let outcome = registry.leave_room(room_id, player)?;
        if outcome == LeaveOutcome::Left {
            self.notify_player_left(&registry, room_id, player);
        }
        Ok(outcome)
    }

    /// Cleans up after a dropped connection.
    ///
    /// Removes the player from their room, if any, and tells the remaining
    /// member who left. Returns the room the player was in.
    pub async fn disconnect(&self, player: PlayerId) -> Option<RoomId> {
        let mut registry = self.registry.lock().await;
        let (room_id, outcome) = registry.leave_all_rooms(player)?;
        if outcome == LeaveOutcome::Left {
            self.notify_player_left(&registry, &room_id, player);
        }
        tracing::info!(%room_id, player_id = %player, "player disconnected from room");
        Some(room_id)
    }

    fn notify_player_left(&self, registry: &RoomRegistry, room_id: &RoomId, departed: PlayerId) {
        let Some(room) = registry.get_room(room_id) else {
            return;
        };
        let timestamp = Utc::now();
        for &recipient in room.players() {
            let _ = self.event_bus.publish(RoomEvent::PlayerLeft {
                room_id: room_id.clone(),
                recipient,
                player_id: departed,
                players: room.players().to_vec(),
                timestamp,
            });
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::broadcast;

    fn make_service() -> RoomService {
        RoomService::new(RoomRegistry::default(), EventBus::new(64))
    }

    fn drain(rx: &mut broadcast::Receiver<RoomEvent>) -> Vec<RoomEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn kinds_for(events: &[RoomEvent], player: PlayerId) -> Vec<&'static str> {
        events
            .iter()
            .filter(|e| e.recipient() == player)
            .map(RoomEvent::event_type_str)
            .collect()
    }

    async fn started_room(service: &RoomService) -> (RoomId, PlayerId, PlayerId) {
        let room_id = service.create_room().await.room_id;
        let p1 = PlayerId::new();
        let p2 = PlayerId::new();
        let Ok(_) = service.join_room(&room_id, p1).await else {
            panic!("p1 join failed");
        };
        let Ok(_) = service.join_room(&room_id, p2).await else {
            panic!("p2 join failed");
        };
        (room_id, p1, p2)
    }

    #[tokio::test]
    async fn first_join_acks_without_events() {
        let service = make_service();
        let mut rx = service.event_bus().subscribe();
        let room_id = service.create_room().await.room_id;
        let p1 = PlayerId::new();

        let Ok(ack) = service.join_room(&room_id, p1).await else {
            panic!("join failed");
        };
        assert!(!ack.started);
        assert_eq!(ack.players, vec![p1]);
        assert_eq!(ack.game_state.opponent_resources, Resources::ZERO);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn second_join_notifies_and_starts() {
        let service = make_service();
        let mut rx = service.event_bus().subscribe();
        let room_id = service.create_room().await.room_id;
        let p1 = PlayerId::new();
        let p2 = PlayerId::new();
        let _ = service.join_room(&room_id, p1).await;

        let Ok(ack) = service.join_room(&room_id, p2).await else {
            panic!("join failed");
        };
        assert!(ack.started);
        assert_eq!(ack.players, vec![p1, p2]);

        let events = drain(&mut rx);
        assert_eq!(kinds_for(&events, p1), vec!["player_joined", "game_started"]);
        assert_eq!(kinds_for(&events, p2), vec!["game_started"]);
    }

    #[tokio::test]
    async fn join_full_room_is_rejected() {
        let service = make_service();
        let (room_id, p1, p2) = started_room(&service).await;

        let result = service.join_room(&room_id, PlayerId::new()).await;
        let Err(GatewayError::Room(RoomError::RoomFull(full))) = result else {
            panic!("expected RoomFull");
        };
        assert_eq!(full, room_id);

        let Ok(detail) = service.get_room(&room_id).await else {
            panic!("room missing");
        };
        assert_eq!(detail.players, vec![p1, p2]);
    }

    #[tokio::test]
    async fn rejoin_emits_nothing() {
        let service = make_service();
        let (room_id, p1, _) = started_room(&service).await;
        let mut rx = service.event_bus().subscribe();

        let Ok(ack) = service.join_room(&room_id, p1).await else {
            panic!("rejoin failed");
        };
        assert!(ack.started);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn update_before_start_is_refused() {
        let service = make_service();
        let room_id = service.create_room().await.room_id;
        let p1 = PlayerId::new();
        let _ = service.join_room(&room_id, p1).await;

        let result = service
            .update_resources(&room_id, p1, &json!([1, 2, 3, 4, 5]))
            .await;
        assert!(matches!(result, Err(GatewayError::GameNotStarted(_))));
    }

    #[tokio::test]
    async fn update_relays_to_opponent_only() {
        let service = make_service();
        let (room_id, p1, p2) = started_room(&service).await;
        let mut rx = service.event_bus().subscribe();

        let Ok(stored) = service
            .update_resources(&room_id, p1, &json!([10, 20, 30, 40, 50]))
            .await
        else {
            panic!("update failed");
        };
        assert_eq!(stored.values(), [10, 20, 30, 40, 50]);

        let events = drain(&mut rx);
        assert_eq!(kinds_for(&events, p2), vec!["resources_updated"]);
        assert!(kinds_for(&events, p1).is_empty());

        let Ok(view) = service.state_for_player(&room_id, p2).await else {
            panic!("view missing");
        };
        assert_eq!(view.opponent_resources, stored);
    }

    #[tokio::test]
    async fn invalid_update_keeps_previous_vector() {
        let service = make_service();
        let (room_id, p1, p2) = started_room(&service).await;
        let _ = service
            .update_resources(&room_id, p1, &json!([10, 20, 30, 40, 50]))
            .await;
        let mut rx = service.event_bus().subscribe();

        for bad in [
            json!([10, 20, 30, 40, 51]),
            json!([10, 20, 30, 40]),
            json!([10, 20, "x", 40, 50]),
            json!([-1, 20, 30, 40, 50]),
        ] {
            let result = service.update_resources(&room_id, p1, &bad).await;
            assert!(matches!(
                result,
                Err(GatewayError::Room(RoomError::InvalidResources(_)))
            ));
        }
        assert!(drain(&mut rx).is_empty());

        let Ok(view) = service.state_for_player(&room_id, p2).await else {
            panic!("view missing");
        };
        assert_eq!(view.opponent_resources.values(), [10, 20, 30, 40, 50]);
    }

    #[tokio::test]
    async fn update_by_stranger_is_rejected() {
        let service = make_service();
        let (room_id, _, _) = started_room(&service).await;
        let result = service
            .update_resources(&room_id, PlayerId::new(), &json!([0, 0, 0, 0, 0]))
            .await;
        assert!(matches!(
            result,
            Err(GatewayError::Room(RoomError::PlayerNotInRoom { .. }))
        ));
    }

    #[tokio::test]
    async fn disconnect_notifies_remaining_member() {
        let service = make_service();
        let (room_id, p1, p2) = started_room(&service).await;
        let mut rx = service.event_bus().subscribe();

        assert_eq!(service.disconnect(p1).await, Some(room_id.clone()));

        let events = drain(&mut rx);
        let [RoomEvent::PlayerLeft {
            recipient,
            player_id,
            players,
            ..
        }] = events.as_slice()
        else {
            panic!("expected a single player_left event, got {events:?}");
        };
        assert_eq!(*recipient, p2);
        assert_eq!(*player_id, p1);
        assert_eq!(players, &vec![p2]);

        let Ok(detail) = service.get_room(&room_id).await else {
            panic!("room should survive with one player");
        };
        assert!(detail.started);

        assert_eq!(service.disconnect(p2).await, Some(room_id.clone()));
        assert!(service.get_room(&room_id).await.is_err());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn disconnect_without_room_is_noop() {
        let service = make_service();
        assert_eq!(service.disconnect(PlayerId::new()).await, None);
    }

    #[tokio::test]
    async fn explicit_leave_frees_player_for_another_room() {
        let service = make_service();
        let (room_id, p1, _) = started_room(&service).await;
        let other = service.create_room().await.room_id;

        assert!(service.join_room(&other, p1).await.is_err());
        assert_eq!(
            service.leave_room(&room_id, p1).await.ok(),
            Some(LeaveOutcome::Left)
        );
        assert!(service.join_room(&other, p1).await.is_ok());
    }

    #[tokio::test]
    async fn list_rooms_open_only() {
        let service = make_service();
        let _ = started_room(&service).await;
        let open = service.create_room().await.room_id;

        assert_eq!(service.list_rooms(false).await.len(), 2);
        let listed = service.list_rooms(true).await;
        assert_eq!(listed.len(), 1);
        assert!(listed.iter().all(|room| room.room_id == open));
        assert_eq!(service.room_count().await, 2);
    }

    #[tokio::test]
    async fn state_lookups_distinguish_errors() {
        let service = make_service();
        let missing = RoomId::parse("0000");
        assert!(matches!(
            service.room_state(&missing).await,
            Err(GatewayError::Room(RoomError::RoomNotFound(_)))
        ));
        let room_id = service.create_room().await.room_id;
        assert!(matches!(
            service.state_for_player(&room_id, PlayerId::new()).await,
            Err(GatewayError::Room(RoomError::PlayerNotInRoom { .. }))
        ));
    }

    #[tokio::test]
    async fn view_of_follows_membership() {
        let service = make_service();
        let (room_id, p1, _p2) = started_room(&service).await;
        let Some(view) = service.view_of(p1).await else {
            panic!("member has no view");
        };
        assert_eq!(view.room_id, room_id);
        assert_eq!(view.players.len(), 2);
        assert!(service.view_of(PlayerId::new()).await.is_none());
    }

    #[tokio::test]
    async fn reaper_drops_unjoined_rooms_after_ttl() {
        let service = make_service();
        let idle = service.create_room().await.room_id;
        let (busy, _, _) = started_room(&service).await;

        assert_eq!(service.reap_empty_rooms(Duration::from_secs(3600)).await, 0);
        assert_eq!(service.room_count().await, 2);

        assert_eq!(service.reap_empty_rooms(Duration::ZERO).await, 1);
        assert!(service.get_room(&idle).await.is_err());
        assert!(service.get_room(&busy).await.is_ok());
    }
}
