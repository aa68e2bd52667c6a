//! Room discovery handlers: create, list, get, state.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    CreateRoomResponse, PaginationParams, RoomDetailResponse, RoomFilter, RoomListResponse,
    RoomSummaryDto,
};
use crate::app_state::AppState;
use crate::domain::RoomId;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /rooms` — Create a new empty room.
#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    tag = "Rooms",
    summary = "Create a room",
    description = "Creates an empty, unstarted room and returns its short code. Players join it over the WebSocket endpoint.",
    responses(
        (status = 201, description = "Room created", body = CreateRoomResponse),
    )
)]
pub async fn create_room(State(state): State<AppState>) -> impl IntoResponse {
    let detail = state.room_service.create_room().await;
    let response = CreateRoomResponse {
        room_id: detail.room_id.clone(),
        room: RoomDetailResponse::from(detail),
    };
    (StatusCode::CREATED, Json(response))
}

/// `GET /rooms` — List live rooms with pagination.
#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    tag = "Rooms",
    summary = "List rooms",
    description = "Returns a paginated list of live rooms, oldest first. With `open=true` only rooms with a free seat are listed.",
    params(PaginationParams, RoomFilter),
    responses(
        (status = 200, description = "Paginated room list", body = RoomListResponse),
    )
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<RoomFilter>,
) -> impl IntoResponse {
    let params = params.clamped();
    let summaries = state.room_service.list_rooms(filter.open).await;
    let total = u32::try_from(summaries.len()).unwrap_or(u32::MAX);

    let data: Vec<RoomSummaryDto> = summaries
        .into_iter()
        .skip(params.offset())
        .take(params.per_page as usize)
        .map(RoomSummaryDto::from)
        .collect();

    Json(RoomListResponse {
        data,
        pagination: params.meta(total),
    })
}

/// `GET /rooms/{id}` — Get room details.
///
/// # Errors
///
/// Returns [`GatewayError`] with 404 if the room does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}",
    tag = "Rooms",
    summary = "Get room details",
    description = "Returns the players and lifecycle timestamps of one room. Resource vectors are not included.",
    params(
        ("id" = String, Path, description = "Room code (case-insensitive)"),
    ),
    responses(
        (status = 200, description = "Room details", body = RoomDetailResponse),
        (status = 404, description = "Room not found", body = ErrorResponse),
    )
)]
pub async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let detail = state.room_service.get_room(&RoomId::parse(&id)).await?;
    Ok(Json(RoomDetailResponse::from(detail)))
}

/// `GET /rooms/{id}/state` — Get the full game state of a room.
///
/// # Errors
///
/// Returns [`GatewayError`] with 404 if the room does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}/state",
    tag = "Rooms",
    summary = "Get room game state",
    description = "Returns every player and their current resource vector.",
    params(
        ("id" = String, Path, description = "Room code (case-insensitive)"),
    ),
    responses(
        (status = 200, description = "Game state", body = serde_json::Value),
        (status = 404, description = "Room not found", body = ErrorResponse),
    )
)]
pub async fn get_room_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let game_state = state.room_service.room_state(&RoomId::parse(&id)).await?;
    Ok(Json(game_state))
}

/// Room routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/{id}", get(get_room))
        .route("/rooms/{id}/state", get(get_room_state))
}
