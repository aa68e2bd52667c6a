//! Short human-shareable room identifier.
//!
//! [`RoomId`] is an uppercase hexadecimal code (e.g. `"3FA9"`) handed out
//! when a room is created and typed in by the second player to join.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Positions of the version (`4`) and variant (`8`..=`b`) digits in a
/// simple-formatted UUID v4.
const UUID_FIXED_DIGITS: [usize; 2] = [12, 16];

/// Identifier of a live room.
///
/// Codes are drawn from the random digits of UUID v4 values; the version
/// and variant digits are skipped, so every character is uniformly
/// distributed. Lookups are case-insensitive: [`RoomId::parse`] normalizes
/// to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Shortest code the registry will generate.
    pub const MIN_LEN: usize = 4;

    /// Longest code the registry will generate.
    pub const MAX_LEN: usize = 32;

    /// Generates a random code of `len` characters, clamped to
    /// [`Self::MIN_LEN`]..=[`Self::MAX_LEN`].
    #[must_use]
    pub fn generate(len: usize) -> Self {
        let len = len.clamp(Self::MIN_LEN, Self::MAX_LEN);
        let code: String = std::iter::repeat_with(uuid::Uuid::new_v4)
            .flat_map(|uuid| {
                uuid.simple()
                    .to_string()
                    .into_bytes()
                    .into_iter()
                    .enumerate()
                    .filter(|(index, _)| !UUID_FIXED_DIGITS.contains(index))
                    .map(|(_, digit)| char::from(digit))
            })
            .take(len)
            .collect();
        Self(code.to_ascii_uppercase())
    }

    /// Normalizes a client-supplied code. Surrounding whitespace is trimmed
    /// and letters are uppercased.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}
