//! pairing-relay server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use pairing_relay::app::build_app;
use pairing_relay::app_state::AppState;
use pairing_relay::config::RelayConfig;
use pairing_relay::domain::{EventBus, RoomRegistry};
use pairing_relay::service::RoomService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = RelayConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    tracing::info!(addr = %config.listen_addr, "starting pairing-relay");

    // Build domain layer
    let registry = RoomRegistry::new(config.room_id_length);
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build service layer
    let room_service = Arc::new(RoomService::new(registry, event_bus));

    // Reap rooms nobody joined
    let reaper = Arc::clone(&room_service);
    let ttl = config.empty_room_ttl;
    let mut ticker = tokio::time::interval(config.reap_interval());
    tokio::spawn(async move {
        loop {
            ticker.tick().await;
            reaper.reap_empty_rooms(ttl).await;
        }
    });

    // Build router
    let app = build_app(AppState::new(room_service));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
