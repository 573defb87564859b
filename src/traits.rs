//! Seams between the planner and its collaborators.
//!
//! Apps implement `RouteStop` for their own booking records; the trip
//! service and geocoder are external HTTP collaborators behind traits so
//! tests can substitute in-process fakes.

use std::hash::Hash;

use crate::coordinate::Coordinate;
use crate::geocode::{GeocodeError, GeocodeQuery};
use crate::osrm::{OptimizedTrip, TripError};

/// Unique identifier for planner entities.
pub trait Id: Clone + Eq + Hash {}

impl<T> Id for T where T: Clone + Eq + Hash {}

/// A stop that can be placed on a route.
pub trait RouteStop {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    /// Location (lat, lng). `None` when the stop was never geocoded or
    /// geocoding failed; such stops never enter planning.
    fn coordinate(&self) -> Option<Coordinate>;

    /// The coordinate, if present and within WGS84 bounds.
    fn routable_coordinate(&self) -> Option<Coordinate> {
        self.coordinate().filter(Coordinate::is_valid)
    }
}

/// Produces an optimized one-way visiting order for a coordinate list.
///
/// The first coordinate is the fixed start of the trip.
pub trait TripService {
    fn optimize_trip(&self, coordinates: &[Coordinate]) -> Result<OptimizedTrip, TripError>;
}

/// Resolves a postal address to a coordinate.
pub trait Geocoder {
    /// `Ok(None)` means the service answered but found no match.
    fn geocode(&self, query: &GeocodeQuery) -> Result<Option<Coordinate>, GeocodeError>;
}

impl<T: TripService + ?Sized> TripService for &T {
    fn optimize_trip(&self, coordinates: &[Coordinate]) -> Result<OptimizedTrip, TripError> {
        (**self).optimize_trip(coordinates)
    }
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn geocode(&self, query: &GeocodeQuery) -> Result<Option<Coordinate>, GeocodeError> {
        (**self).geocode(query)
    }
}
