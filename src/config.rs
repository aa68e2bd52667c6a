//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).
//!
//! | Variable             | Default          |
//! |----------------------|------------------|
//! | `LISTEN_ADDR`        | `0.0.0.0:$PORT`  |
//! | `PORT`               | `3001`           |
//! | `ROOM_ID_LENGTH`     | `4`              |
//! | `EVENT_BUS_CAPACITY` | `1024`           |
//! | `EMPTY_ROOM_TTL_SECS`| `300`            |
//! | `LOG_JSON`           | `false`          |

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

use crate::domain::RoomId;

/// Port used when neither `LISTEN_ADDR` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 3001;

/// Seconds an unjoined room survives when `EMPTY_ROOM_TTL_SECS` is unset.
pub const DEFAULT_EMPTY_ROOM_TTL_SECS: u64 = 300;

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3001`).
    pub listen_addr: SocketAddr,

    /// Length of newly generated room codes.
    pub room_id_length: usize,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// How long a room nobody has joined is kept before it is reaped.
    pub empty_room_ttl: Duration,

    /// Emit log lines as JSON instead of human-readable text.
    pub log_json: bool,
}

impl RelayConfig {
    /// Period of the empty-room reaper: half the TTL, between 1 and 60
    /// seconds.
    #[must_use]
    pub fn reap_interval(&self) -> Duration {
        (self.empty_room_ttl / 2).clamp(Duration::from_secs(1), Duration::from_secs(60))
    }
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr = match std::env::var("LISTEN_ADDR") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("invalid LISTEN_ADDR {raw:?}"))?,
            Err(_) => SocketAddr::from(([0, 0, 0, 0], parse_env("PORT", DEFAULT_PORT))),
        };

        let room_id_length =
            parse_env("ROOM_ID_LENGTH", RoomId::MIN_LEN).clamp(RoomId::MIN_LEN, RoomId::MAX_LEN);
        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 1024usize).max(1);
        let empty_room_ttl = Duration::from_secs(parse_env(
            "EMPTY_ROOM_TTL_SECS",
            DEFAULT_EMPTY_ROOM_TTL_SECS,
        ));
        let log_json = parse_env_bool("LOG_JSON", false);

        Ok(Self {
            listen_addr,
            room_id_length,
            event_bus_capacity,
            empty_room_ttl,
            log_json,
        })
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            room_id_length: RoomId::MIN_LEN,
            event_bus_capacity: 1024,
            empty_room_ttl: Duration::from_secs(DEFAULT_EMPTY_ROOM_TTL_SECS),
            log_json: false,
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
