//! System endpoints: health check and room rules.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::{RESOURCE_MAX, RESOURCE_MIN, RESOURCE_SLOTS, ROOM_CAPACITY};

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    rooms: usize,
    connections: usize,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, current timestamp, and live room and connection counts.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            rooms: state.room_service.room_count().await,
            connections: state.event_bus.receiver_count(),
        }),
    )
}

/// Limits every room enforces.
#[derive(Debug, Serialize, ToSchema)]
pub struct RulesResponse {
    room_capacity: usize,
    resource_slots: usize,
    resource_min: u8,
    resource_max: u8,
}

/// `GET /config/rules` — Room capacity and resource bounds.
#[utoipa::path(
    get,
    path = "/config/rules",
    tag = "System",
    summary = "Room rules",
    description = "Returns the room capacity and the length and bounds of a resource vector.",
    responses(
        (status = 200, description = "Room rules", body = RulesResponse),
    )
)]
pub async fn rules_handler() -> impl IntoResponse {
    Json(RulesResponse {
        room_capacity: ROOM_CAPACITY,
        resource_slots: RESOURCE_SLOTS,
        resource_min: RESOURCE_MIN,
        resource_max: RESOURCE_MAX,
    })
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/rules", get(rules_handler))
}
