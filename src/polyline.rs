//! Road-following route geometry.
//!
//! Points are stored latitude-first. GeoJSON line strings from the trip
//! service are longitude-first and get swapped once, on the way in.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// The literal road path of an optimized trip, depot first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a polyline from latitude-first points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Creates a polyline from GeoJSON `[lng, lat]` positions.
    pub fn from_lng_lat(positions: &[[f64; 2]]) -> Self {
        Self {
            points: positions.iter().copied().map(Coordinate::from_lng_lat).collect(),
        }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lng_lat_swaps_every_point() {
        let polyline = Polyline::from_lng_lat(&[[-84.317, 46.524], [-84.32, 46.53]]);
        assert_eq!(
            polyline.points(),
            &[Coordinate::new(46.524, -84.317), Coordinate::new(46.53, -84.32)][..]
        );
    }

    #[test]
    fn test_into_points_keeps_order() {
        let points = vec![Coordinate::new(1.0, 2.0), Coordinate::new(3.0, 4.0)];
        let polyline = Polyline::new(points.clone());
        assert_eq!(polyline.len(), 2);
        assert_eq!(polyline.into_points(), points);
    }

    #[test]
    fn test_empty_polyline() {
        let polyline = Polyline::from_lng_lat(&[]);
        assert!(polyline.is_empty());
    }
}
