//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection:
//! dispatches incoming commands to the [`RoomService`], forwards the
//! events addressed to this connection's player, and cleans up room
//! membership when the socket goes away.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use crate::domain::{LeaveOutcome, PlayerId, RoomEvent, RoomId};
use crate::error::GatewayError;
use crate::service::RoomService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Mints a [`PlayerId`] and announces it with a `connected` event.
/// - Reads commands from the client and answers each with a response or
///   an error frame.
/// - Forwards events from the [`broadcast::Receiver`] whose recipient is
///   this player.
/// - After falling behind the bus, sends a `resync` event with the
///   player's current room view.
/// - On close or send failure, runs [`RoomService::disconnect`].
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<RoomEvent>,
    room_service: Arc<RoomService>,
) {
    let player = PlayerId::new();
    let (mut ws_tx, mut ws_rx) = socket.split();
    tracing::info!(player_id = %player, "ws connection opened");

    let hello = WsMessage::event(serde_json::json!({
        "event_type": "connected",
        "player_id": player,
    }));
    let mut open = ws_tx.send(Message::text(hello.to_json())).await.is_ok();

    while open {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&text, player, &room_service).await;
                        if ws_tx.send(Message::text(reply.to_json())).await.is_err() {
                            open = false;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => open = false,
                    Some(Err(err)) => {
                        tracing::debug!(player_id = %player, error = %err, "ws read error");
                        open = false;
                    }
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                match event {
                    Ok(room_event) => {
                        if room_event.recipient() == player {
                            let msg = WsMessage::event(
                                serde_json::to_value(&room_event).unwrap_or_default(),
                            );
                            if ws_tx.send(Message::text(msg.to_json())).await.is_err() {
                                open = false;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(player_id = %player, lagged = n, "ws client lagged behind event bus");
                        if let Some(msg) = resync_message(player, &room_service).await
                            && ws_tx.send(Message::text(msg.to_json())).await.is_err()
                        {
                            open = false;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => open = false,
                }
            }
        }
    }

    if let Some(room_id) = room_service.disconnect(player).await {
        tracing::debug!(player_id = %player, %room_id, "membership released on close");
    }
    tracing::info!(player_id = %player, "ws connection closed");
}

/// Builds the event that replaces whatever a lagging receiver dropped.
///
/// Returns `None` when the player is not in a room.
async fn resync_message(player: PlayerId, service: &RoomService) -> Option<WsMessage> {
    let view = service.view_of(player).await?;
    Some(WsMessage::event(serde_json::json!({
        "event_type": "resync",
        "room_id": view.room_id,
        "game_state": view,
    })))
}

/// Handles a text frame from the client, returning the reply envelope.
async fn handle_text_message(text: &str, player: PlayerId, service: &RoomService) -> WsMessage {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error(
            String::new(),
            &GatewayError::InvalidRequest("malformed JSON".to_string()),
        );
    };
    if msg.msg_type != WsMessageType::Command {
        return WsMessage::error(
            msg.id,
            &GatewayError::InvalidRequest("expected a command message".to_string()),
        );
    }

    match dispatch(&msg.payload, player, service).await {
        Ok(payload) => WsMessage::response(msg.id, payload),
        Err(err) => {
            tracing::debug!(player_id = %player, error = %err, "command rejected");
            WsMessage::error(msg.id, &err)
        }
    }
}

/// Runs one command against the service and renders its result.
async fn dispatch(
    payload: &serde_json::Value,
    player: PlayerId,
    service: &RoomService,
) -> Result<serde_json::Value, GatewayError> {
    match WsCommand::from_payload(payload)? {
        WsCommand::JoinRoom { room_id } => {
            let ack = service.join_room(&RoomId::parse(&room_id), player).await?;
            to_payload(&ack)
        }
        WsCommand::UpdateResources { room_id, resources } => {
            let room_id = RoomId::parse(&room_id);
            let stored = service
                .update_resources(&room_id, player, &resources)
                .await?;
            Ok(serde_json::json!({
                "room_id": room_id,
                "resources": stored,
            }))
        }
        WsCommand::LeaveRoom { room_id } => {
            let room_id = RoomId::parse(&room_id);
            let outcome = service.leave_room(&room_id, player).await?;
            Ok(serde_json::json!({
                "room_id": room_id,
                "left": outcome != LeaveOutcome::NotMember,
            }))
        }
        WsCommand::GetState { room_id } => {
            let view = service
                .state_for_player(&RoomId::parse(&room_id), player)
                .await?;
            to_payload(&view)
        }
    }
}

fn to_payload<T: Serialize>(value: &T) -> Result<serde_json::Value, GatewayError> {
    serde_json::to_value(value).map_err(|e| GatewayError::Internal(e.to_string()))
}
