//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the transport layer. It
//! wraps the registry's [`RoomError`] and maps every variant to a numeric
//! code, an HTTP status, and a structured JSON body shared by REST
//! responses and WebSocket error frames.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{RoomError, RoomId};

/// Structured JSON error response body.
///
/// All REST error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "room not found: AB12",
///     "details": "AB12"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
///
/// WebSocket error frames carry this body directly as their payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see [`GatewayError::error_code`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details, such as the affected room id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request              |
/// | 2000–2999 | State/Not Found | 403 / 404 / 409              |
/// | 3000–3999 | Server          | 500 Internal Server Error    |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Rejected registry operation.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// Resource updates are refused until the second player joins.
    #[error("game has not started yet in room {0}; wait for second player")]
    GameNotStarted(RoomId),

    /// Request could not be parsed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// WebSocket command name is not recognised.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1000,
            Self::Room(RoomError::InvalidResources(_)) => 1001,
            Self::UnknownCommand(_) => 1004,
            Self::Room(RoomError::RoomNotFound(_)) => 2001,
            Self::Room(RoomError::RoomFull(_)) => 2002,
            Self::Room(RoomError::PlayerNotInRoom { .. }) => 2003,
            Self::Room(RoomError::PlayerInAnotherRoom { .. }) => 2004,
            Self::GameNotStarted(_) => 2005,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_)
            | Self::UnknownCommand(_)
            | Self::Room(RoomError::InvalidResources(_)) => StatusCode::BAD_REQUEST,
            Self::Room(RoomError::RoomNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Room(RoomError::PlayerNotInRoom { .. }) => StatusCode::FORBIDDEN,
            Self::Room(RoomError::RoomFull(_) | RoomError::PlayerInAnotherRoom { .. })
            | Self::GameNotStarted(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the room this error concerns, if any.
    #[must_use]
    pub fn room_id(&self) -> Option<&RoomId> {
        match self {
            Self::Room(
                RoomError::RoomNotFound(room_id)
                | RoomError::RoomFull(room_id)
                | RoomError::PlayerNotInRoom { room_id, .. }
                | RoomError::PlayerInAnotherRoom { room_id, .. },
            )
            | Self::GameNotStarted(room_id) => Some(room_id),
            Self::Room(RoomError::InvalidResources(_))
            | Self::InvalidRequest(_)
            | Self::UnknownCommand(_)
            | Self::Internal(_) => None,
        }
    }

    /// Builds the structured body sent to clients.
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.error_code(),
            message: self.to_string(),
            details: self.room_id().map(ToString::to_string),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse { error: self.body() };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::PlayerId;

    #[test]
    fn room_not_found_maps_to_404() {
        let err = GatewayError::from(RoomError::RoomNotFound(RoomId::parse("AB12")));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2001);
        assert_eq!(err.to_string(), "room not found: AB12");
    }

    #[test]
    fn room_full_carries_room_id() {
        let err = GatewayError::from(RoomError::RoomFull(RoomId::parse("AB12")));
        let body = err.body();
        assert_eq!(body.code, 2002);
        assert_eq!(body.details.as_deref(), Some("AB12"));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_errors_map_to_400() {
        let err = GatewayError::from(RoomError::InvalidResources("bad".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.body().details.is_none());
        assert_eq!(
            GatewayError::UnknownCommand("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn membership_errors() {
        let err = GatewayError::from(RoomError::PlayerNotInRoom {
            room_id: RoomId::parse("AB12"),
            player_id: PlayerId::new(),
        });
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            GatewayError::GameNotStarted(RoomId::parse("AB12")).error_code(),
            2005
        );
    }

    #[test]
    fn into_response_sets_status() {
        let response = GatewayError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
