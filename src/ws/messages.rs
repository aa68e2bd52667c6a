//! WebSocket message types: envelope, commands, and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    #[serde(default)]
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type", default = "WsMessageType::command")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp. Optional on client commands.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client event.
    Event,
    /// Server → Client error.
    Error,
}

impl WsMessageType {
    const fn command() -> Self {
        Self::Command
    }
}

impl WsMessage {
    /// Response to the command with the given `id`.
    #[must_use]
    pub fn response(id: String, payload: serde_json::Value) -> Self {
        Self {
            id,
            msg_type: WsMessageType::Response,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Server-initiated event with a fresh id.
    #[must_use]
    pub fn event(payload: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            msg_type: WsMessageType::Event,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Error reply to the command with the given `id`.
    #[must_use]
    pub fn error(id: String, err: &GatewayError) -> Self {
        Self {
            id,
            msg_type: WsMessageType::Error,
            timestamp: Utc::now(),
            payload: serde_json::to_value(err.body()).unwrap_or_default(),
        }
    }

    /// Serializes the envelope to a JSON string.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Commands that a client can send over WebSocket.
///
/// Carried in the envelope payload, tagged by the `command` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Join a room by code.
    JoinRoom {
        /// Room code.
        room_id: String,
    },
    /// Replace the sender's resource vector.
    UpdateResources {
        /// Room code.
        room_id: String,
        /// Raw vector; validated by the service.
        #[serde(default)]
        resources: serde_json::Value,
    },
    /// Leave a room without disconnecting.
    LeaveRoom {
        /// Room code.
        room_id: String,
    },
    /// Fetch the sender's view of a room.
    GetState {
        /// Room code.
        room_id: String,
    },
}

impl WsCommand {
    /// Command names understood by the gateway.
    pub const NAMES: [&'static str; 4] = ["join_room", "update_resources", "leave_room", "get_state"];

    /// Parses a command payload.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownCommand`] for an unrecognised
    /// `command` value and [`GatewayError::InvalidRequest`] for a missing
    /// name or malformed fields.
    pub fn from_payload(payload: &serde_json::Value) -> Result<Self, GatewayError> {
        let name = payload
            .get("command")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| GatewayError::InvalidRequest("missing command".to_string()))?;
        if !Self::NAMES.contains(&name) {
            return Err(GatewayError::UnknownCommand(name.to_string()));
        }
        serde_json::from_value(payload.clone())
            .map_err(|e| GatewayError::InvalidRequest(format!("malformed {name}: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_defaults_for_minimal_command() {
        let Ok(msg) = serde_json::from_str::<WsMessage>(
            r#"{"payload": {"command": "join_room", "room_id": "ab12"}}"#,
        ) else {
            panic!("minimal envelope rejected");
        };
        assert_eq!(msg.msg_type, WsMessageType::Command);
        assert!(msg.id.is_empty());
    }

    #[test]
    fn parses_update_resources() {
        let payload = json!({
            "command": "update_resources",
            "room_id": "AB12",
            "resources": [1, 2, 3, 4, 5],
        });
        let Ok(WsCommand::UpdateResources { room_id, resources }) =
            WsCommand::from_payload(&payload)
        else {
            panic!("expected update_resources");
        };
        assert_eq!(room_id, "AB12");
        assert_eq!(resources, json!([1, 2, 3, 4, 5]));
    }

    #[test]
    fn unknown_command_is_distinguished() {
        let result = WsCommand::from_payload(&json!({"command": "swap"}));
        assert!(matches!(result, Err(GatewayError::UnknownCommand(name)) if name == "swap"));
    }

    #[test]
    fn missing_fields_are_invalid_requests() {
        assert!(matches!(
            WsCommand::from_payload(&json!({"command": "join_room"})),
            Err(GatewayError::InvalidRequest(_))
        ));
        assert!(matches!(
            WsCommand::from_payload(&json!({"room_id": "AB12"})),
            Err(GatewayError::InvalidRequest(_))
        ));
    }

    #[test]
    fn error_frame_carries_code() {
        let err = GatewayError::InvalidRequest("nope".to_string());
        let msg = WsMessage::error("req-1".to_string(), &err);
        let json = msg.to_json();
        assert!(json.contains("\"type\":\"error\""));
        assert!(json.contains("\"code\":1000"));
        assert!(json.contains("req-1"));
    }
}
