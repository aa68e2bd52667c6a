//! Bounded per-player resource vector.
//!
//! A [`Resources`] value can only be built through validation, so every
//! vector stored in the registry holds exactly [`RESOURCE_SLOTS`] integers
//! within [`RESOURCE_MIN`]..=[`RESOURCE_MAX`].

use serde::Serialize;

use super::RoomError;

/// Number of entries in a resource vector.
pub const RESOURCE_SLOTS: usize = 5;

/// Smallest allowed entry.
pub const RESOURCE_MIN: u8 = 0;

/// Largest allowed entry.
pub const RESOURCE_MAX: u8 = 50;

/// Validated resource vector of one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Resources([u8; RESOURCE_SLOTS]);

impl Resources {
    /// The all-zero vector assigned to a player on join.
    pub const ZERO: Self = Self([0; RESOURCE_SLOTS]);

    /// Validates a JSON value submitted by a client.
    ///
    /// Accepts an array of exactly five numbers. Integral floats such as
    /// `10.0` are accepted; fractional, non-finite and non-numeric entries
    /// are not.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::InvalidResources`] describing the first
    /// offending element. Nothing is partially applied.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, RoomError> {
        let items = value.as_array().ok_or_else(|| {
            RoomError::InvalidResources(format!(
                "expected an array of {RESOURCE_SLOTS} numbers"
            ))
        })?;
        check_len(items.len())?;

        let mut slots = [0i64; RESOURCE_SLOTS];
        for (index, (slot, item)) in slots.iter_mut().zip(items).enumerate() {
            *slot = json_integer(item).ok_or_else(|| {
                RoomError::InvalidResources(format!(
                    "value at index {index} is not an integer: {item}"
                ))
            })?;
        }
        Self::try_from(slots.as_slice())
    }

    /// Returns the entries as a fixed-size array.
    #[must_use]
    pub const fn values(&self) -> [u8; RESOURCE_SLOTS] {
        self.0
    }
}

impl TryFrom<&[i64]> for Resources {
    type Error = RoomError;

    fn try_from(values: &[i64]) -> Result<Self, Self::Error> {
        check_len(values.len())?;

        let mut slots = [0u8; RESOURCE_SLOTS];
        for (index, (slot, value)) in slots.iter_mut().zip(values).enumerate() {
            *slot = u8::try_from(*value)
                .ok()
                .filter(|v| (RESOURCE_MIN..=RESOURCE_MAX).contains(v))
                .ok_or_else(|| {
                    RoomError::InvalidResources(format!(
                        "value at index {index} is {value}, must be between \
                         {RESOURCE_MIN} and {RESOURCE_MAX}"
                    ))
                })?;
        }
        Ok(Self(slots))
    }
}

fn check_len(len: usize) -> Result<(), RoomError> {
    if len == RESOURCE_SLOTS {
        Ok(())
    } else {
        Err(RoomError::InvalidResources(format!(
            "expected {RESOURCE_SLOTS} values, got {len}"
        )))
    }
}

/// Reads a JSON number as an integer. Out-of-range magnitudes saturate so
/// that the bounds check reports them.
fn json_integer(value: &serde_json::Value) -> Option<i64> {
    if let Some(v) = value.as_i64() {
        return Some(v);
    }
    if value.as_u64().is_some() {
        return Some(i64::MAX);
    }
    let v = value.as_f64()?;
    if !v.is_finite() || v.fract() != 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(v as i64)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expect_invalid(value: serde_json::Value) -> String {
        match Resources::from_json(&value) {
            Err(RoomError::InvalidResources(reason)) => reason,
            other => panic!("expected InvalidResources, got {other:?}"),
        }
    }

    #[test]
    fn accepts_bounds() {
        let Ok(res) = Resources::from_json(&json!([0, 50, 25, 1, 49])) else {
            panic!("valid vector rejected");
        };
        assert_eq!(res.values(), [0, 50, 25, 1, 49]);
    }

    #[test]
    fn accepts_integral_floats() {
        let Ok(res) = Resources::from_json(&json!([10.0, 0, 0, 0, 0])) else {
            panic!("integral float rejected");
        };
        assert_eq!(res.values(), [10, 0, 0, 0, 0]);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(expect_invalid(json!([1, 2, 3, 4])).contains("got 4"));
        assert!(expect_invalid(json!([1, 2, 3, 4, 5, 6])).contains("got 6"));
        assert!(expect_invalid(json!([])).contains("got 0"));
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(expect_invalid(json!([10, 20, 30, 40, 51])).contains("index 4"));
        assert!(expect_invalid(json!([-1, 0, 0, 0, 0])).contains("index 0"));
        expect_invalid(json!([0, 0, u64::MAX, 0, 0]));
    }

    #[test]
    fn rejects_non_numeric_and_fractional() {
        assert!(expect_invalid(json!([0, "5", 0, 0, 0])).contains("index 1"));
        expect_invalid(json!([0, 0, null, 0, 0]));
        expect_invalid(json!([0, 0, 0, 2.5, 0]));
    }

    #[test]
    fn rejects_non_array() {
        expect_invalid(json!({"a": 1}));
        expect_invalid(json!("1,2,3,4,5"));
    }

    #[test]
    fn try_from_slice_checks_bounds() {
        assert!(Resources::try_from(&[1i64, 2, 3, 4, 5][..]).is_ok());
        assert!(Resources::try_from(&[1i64, 2, 3, 4, 500][..]).is_err());
    }

    #[test]
    fn serializes_as_array() {
        let Ok(res) = Resources::try_from(&[10i64, 20, 30, 40, 50][..]) else {
            panic!("valid vector rejected");
        };
        let json = serde_json::to_string(&res).unwrap_or_default();
        assert_eq!(json, "[10,20,30,40,50]");
        assert_eq!(
            serde_json::to_string(&Resources::ZERO).unwrap_or_default(),
            "[0,0,0,0,0]"
        );
    }
}
