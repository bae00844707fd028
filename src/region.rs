//! Geographic bounding region shared by every filter and draw call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mercator is undefined at the poles; keep latitudes inside this band.
pub const MAX_MERCATOR_LAT: f64 = 85.0;

#[derive(Debug, Error, PartialEq)]
pub enum RegionError {
    #[error("region bound {0} is not a finite number")]
    NotFinite(&'static str),

    #[error("invalid longitude range: min {min} must be less than max {max}")]
    LongitudeOrder { min: f64, max: f64 },

    #[error("invalid latitude range: min {min} must be less than max {max}")]
    LatitudeOrder { min: f64, max: f64 },

    #[error("latitude {0} is outside the Mercator band (±85°)")]
    LatitudeOutOfRange(f64),

    #[error("region string '{0}' must look like W/E/S/N")]
    InvalidFormat(String),
}

/// Rectangular lon/lat region, bounds inclusive.
///
/// Serialized as the GMT-style `[west, east, south, north]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingRegion {
    min_lon: f64,
    max_lon: f64,
    min_lat: f64,
    max_lat: f64,
}

impl BoundingRegion {
    /// Build a region, checking that each axis is ordered and finite.
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Result<Self, RegionError> {
        for (name, value) in [
            ("min_lon", min_lon),
            ("max_lon", max_lon),
            ("min_lat", min_lat),
            ("max_lat", max_lat),
        ] {
            if !value.is_finite() {
                return Err(RegionError::NotFinite(name));
            }
        }
        if min_lon >= max_lon {
            return Err(RegionError::LongitudeOrder { min: min_lon, max: max_lon });
        }
        if min_lat >= max_lat {
            return Err(RegionError::LatitudeOrder { min: min_lat, max: max_lat });
        }
        for lat in [min_lat, max_lat] {
            if lat.abs() >= MAX_MERCATOR_LAT {
                return Err(RegionError::LatitudeOutOfRange(lat));
            }
        }

        Ok(Self { min_lon, max_lon, min_lat, max_lat })
    }

    /// The Philippine Sea Plate window: Taiwan, Japan and the Marianas.
    pub fn philippine_sea() -> Self {
        Self {
            min_lon: 115.0,
            max_lon: 150.0,
            min_lat: 0.0,
            max_lat: 40.0,
        }
    }

    /// Parse a `W/E/S/N` string (commas are accepted as separators too).
    pub fn parse(s: &str) -> Result<Self, RegionError> {
        let parts: Vec<&str> = s.split(['/', ',']).map(str::trim).collect();
        if parts.len() != 4 {
            return Err(RegionError::InvalidFormat(s.to_string()));
        }

        let mut bounds = [0.0f64; 4];
        for (slot, part) in bounds.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| RegionError::InvalidFormat(s.to_string()))?;
        }

        Self::try_from(bounds)
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Inclusive containment test used by the seismicity filter.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }
}

impl Default for BoundingRegion {
    fn default() -> Self {
        Self::philippine_sea()
    }
}

impl TryFrom<[f64; 4]> for BoundingRegion {
    type Error = RegionError;

    fn try_from(b: [f64; 4]) -> Result<Self, Self::Error> {
        Self::new(b[0], b[1], b[2], b[3])
    }
}

impl From<BoundingRegion> for [f64; 4] {
    fn from(r: BoundingRegion) -> Self {
        [r.min_lon, r.max_lon, r.min_lat, r.max_lat]
    }
}

impl std::fmt::Display for BoundingRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}/{}", self.min_lon, self.max_lon, self.min_lat, self.max_lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_region_is_ordered() {
        let r = BoundingRegion::default();
        assert!(r.min_lon() < r.max_lon());
        assert!(r.min_lat() < r.max_lat());
        assert_eq!(<[f64; 4]>::from(r), [115.0, 150.0, 0.0, 40.0]);
    }

    #[test]
    fn test_rejects_inverted_axes() {
        assert_eq!(
            BoundingRegion::new(150.0, 115.0, 0.0, 40.0),
            Err(RegionError::LongitudeOrder { min: 150.0, max: 115.0 })
        );
        assert!(matches!(
            BoundingRegion::new(115.0, 150.0, 40.0, 40.0),
            Err(RegionError::LatitudeOrder { .. })
        ));
        assert!(matches!(
            BoundingRegion::new(115.0, 150.0, 0.0, 89.0),
            Err(RegionError::LatitudeOutOfRange(_))
        ));
        assert!(matches!(
            BoundingRegion::new(f64::NAN, 150.0, 0.0, 40.0),
            Err(RegionError::NotFinite("min_lon"))
        ));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let r = BoundingRegion::philippine_sea();
        assert!(r.contains(115.0, 0.0));
        assert!(r.contains(150.0, 40.0));
        assert!(r.contains(120.0, 20.0));
        assert!(!r.contains(114.999, 20.0));
        assert!(!r.contains(120.0, 40.001));
    }

    #[test]
    fn test_parse_region_string() {
        let r = BoundingRegion::parse("115/150/0/40").unwrap();
        assert_eq!(r, BoundingRegion::philippine_sea());
        let r = BoundingRegion::parse("120, 130, 10, 20").unwrap();
        assert_eq!(r.lon_span(), 10.0);
        assert!(BoundingRegion::parse("1/2/3").is_err());
        assert!(BoundingRegion::parse("a/b/c/d").is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let r: BoundingRegion = serde_json::from_str("[115, 150, 0, 40]").unwrap();
        assert_eq!(r, BoundingRegion::philippine_sea());
        assert!(serde_json::from_str::<BoundingRegion>("[150, 115, 0, 40]").is_err());
    }
}
