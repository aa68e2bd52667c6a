//! Room-related DTOs for create, get, and list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::PaginationMeta;
use crate::domain::{PlayerId, RoomDetail, RoomId, RoomSummary};

/// Optional filters for `GET /rooms`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RoomFilter {
    /// When `true`, only rooms with a free seat are listed.
    #[serde(default)]
    pub open: bool,
}

/// Room summary for list responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomSummaryDto {
    /// Room code.
    #[schema(value_type = String)]
    pub room_id: RoomId,
    /// Current number of players.
    pub player_count: usize,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<RoomSummary> for RoomSummaryDto {
    fn from(summary: RoomSummary) -> Self {
        Self {
            room_id: summary.room_id,
            player_count: summary.player_count,
            created_at: summary.created_at,
        }
    }
}

/// Paginated list response for `GET /rooms`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomListResponse {
    /// Room summaries.
    pub data: Vec<RoomSummaryDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Single room detail for `GET /rooms/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomDetailResponse {
    /// Room code.
    #[schema(value_type = String)]
    pub room_id: RoomId,
    /// Player handles in join order.
    #[schema(value_type = Vec<String>)]
    pub players: Vec<PlayerId>,
    /// Current number of players.
    pub player_count: usize,
    /// Whether the second player has joined.
    pub started: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// When the room started, if it has.
    pub started_at: Option<DateTime<Utc>>,
}

impl From<RoomDetail> for RoomDetailResponse {
    fn from(detail: RoomDetail) -> Self {
        Self {
            room_id: detail.room_id,
            players: detail.players,
            player_count: detail.player_count,
            started: detail.started,
            created_at: detail.created_at,
            started_at: detail.started_at,
        }
    }
}

/// Response body for `POST /rooms` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateRoomResponse {
    /// Code to share with the second player.
    #[schema(value_type = String)]
    pub room_id: RoomId,
    /// The new, empty room.
    pub room: RoomDetailResponse,
}
