//! Geographic coordinates.

use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees, latitude first.
///
/// Every coordinate inside the crate is latitude-first. Services that speak
/// longitude-first (OSRM, GeoJSON) are converted at their adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds a coordinate from a longitude-first pair.
    pub fn from_lng_lat(lng_lat: [f64; 2]) -> Self {
        Self {
            lat: lng_lat[1],
            lng: lng_lat[0],
        }
    }

    /// True when both components are finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Renders the coordinate as an OSRM `lng,lat` path segment.
    pub(crate) fn to_osrm_param(self) -> String {
        format!("{:.6},{:.6}", self.lng, self.lat)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(coordinate: Coordinate) -> Self {
        (coordinate.lat, coordinate.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lng_lat_swaps_axes() {
        let coordinate = Coordinate::from_lng_lat([-84.317, 46.524]);
        assert_eq!(coordinate, Coordinate::new(46.524, -84.317));
    }

    #[test]
    fn test_osrm_param_is_longitude_first() {
        let coordinate = Coordinate::new(46.524, -84.317);
        assert_eq!(coordinate.to_osrm_param(), "-84.317000,46.524000");
    }

    #[test]
    fn test_validity() {
        assert!(Coordinate::new(46.524, -84.317).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_tuple_conversions() {
        let coordinate: Coordinate = (46.5, -84.3).into();
        let pair: (f64, f64) = coordinate.into();
        assert_eq!(pair, (46.5, -84.3));
    }
}
