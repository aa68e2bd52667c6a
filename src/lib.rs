//! # pairing-relay
//!
//! Real-time room pairing relay for two-player resource-sharing sessions.
//!
//! Clients create or discover rooms over REST, then connect to the
//! WebSocket gateway to join one. Once two players are present the server
//! relays each player's five-slot resource vector to the opponent.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Gateway (ws/)
//!     │
//!     ├── RoomService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     └── RoomRegistry (domain/)
//! ```
//!
//! The registry is an explicitly constructed value handed to
//! [`service::RoomService`] at startup; there is no global state.

pub mod api;
pub mod app;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
