//! Grid points and fixed-point math utilities.
//!
//! All simulation math uses fixed-point arithmetic to ensure
//! deterministic behavior across platforms. Floating-point
//! operations can produce different results on different CPUs.

use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// A point on the campaign map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MapPoint {
    /// Column, west to east.
    pub x: i32,
    /// Row, north to south.
    pub y: i32,
}

impl MapPoint {
    /// Create a new grid point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Encode as a record field: `"x y"`.
    #[must_use]
    pub fn to_record(self) -> String {
        format!("{} {}", self.x, self.y)
    }

    /// Decode from a record field produced by [`MapPoint::to_record`].
    #[must_use]
    pub fn parse_record(s: &str) -> Option<Self> {
        let mut parts = s.split_whitespace();
        let x = parts.next()?.parse().ok()?;
        let y = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { x, y })
    }

    /// Encode a point list as a record field: points joined by `";"`.
    #[must_use]
    pub fn list_to_record(points: &[Self]) -> String {
        points
            .iter()
            .map(|p| p.to_record())
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Decode a point list from a record field.
    ///
    /// An empty field is an empty list.
    #[must_use]
    pub fn parse_record_list(s: &str) -> Option<Vec<Self>> {
        if s.trim().is_empty() {
            return Some(Vec::new());
        }
        s.split(';').map(Self::parse_record).collect()
    }
}

impl std::fmt::Display for MapPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}
