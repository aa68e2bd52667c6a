//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Room endpoints are mounted under `/api/v1`; system endpoints live at
//! the root.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI description of the REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "pairing-relay",
        description = "Two-player room pairing relay. Rooms are discovered over REST; play happens on `/ws`."
    ),
    paths(
        handlers::room::create_room,
        handlers::room::list_rooms,
        handlers::room::get_room,
        handlers::room::get_room_state,
        handlers::system::health_handler,
        handlers::system::rules_handler,
    ),
    components(schemas(
        dto::CreateRoomResponse,
        dto::RoomDetailResponse,
        dto::RoomListResponse,
        dto::RoomSummaryDto,
        dto::PaginationMeta,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "Rooms", description = "Room discovery and creation"),
        (name = "System", description = "Health and configuration"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}
