//! WebSocket layer: connection handling and message routing.
//!
//! The WebSocket endpoint at `/ws` is the session gateway: each connection
//! becomes one transient player that can join a room, push resource
//! vectors, and receive the events addressed to it.

pub mod connection;
pub mod handler;
pub mod messages;
