//! Sector addressing (§3 Sector, GLOSSARY "Sector").
//!
//! Keeps a `Coordinate` / distance-calculation shape, drops chain-id
//! hashing and flight-path fuel planning (fleet movement physics are
//! outside this engine's data model) and adds the `"x,y"` string form §3
//! specifies planets are keyed by.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An integer (x, y) bucket in the galaxy map (GLOSSARY: Sector).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct SectorCoordinate {
    pub x: i64,
    pub y: i64,
}

impl SectorCoordinate {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn chebyshev_distance(&self, other: &SectorCoordinate) -> u64 {
        std::cmp::max((self.x - other.x).unsigned_abs(), (self.y - other.y).unsigned_abs())
    }
}

impl fmt::Display for SectorCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid sector coordinate string: {0}")]
pub struct ParseSectorError(String);

impl FromStr for SectorCoordinate {
    type Err = ParseSectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ',');
        let (x, y) = match (parts.next(), parts.next()) {
            (Some(x), Some(y)) => (x, y),
            _ => return Err(ParseSectorError(s.to_string())),
        };
        let x: i64 = x.trim().parse().map_err(|_| ParseSectorError(s.to_string()))?;
        let y: i64 = y.trim().parse().map_err(|_| ParseSectorError(s.to_string()))?;
        Ok(SectorCoordinate::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_string() {
        let sector = SectorCoordinate::new(-3, 5);
        let s = sector.to_string();
        assert_eq!(s, "-3,5");
        let parsed: SectorCoordinate = s.parse().unwrap();
        assert_eq!(parsed, sector);
    }

    #[test]
    fn rejects_malformed_string() {
        assert!("not-a-sector".parse::<SectorCoordinate>().is_err());
    }
}
