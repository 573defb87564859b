//! Route planner.
//!
//! Asks the trip service for an optimized one-way order starting at the
//! depot and silently falls back to nearest-neighbor when that fails.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::coordinate::Coordinate;
use crate::nearest_neighbor::{nearest_neighbor_route, usable_speed, FALLBACK_SPEED_MPS};
use crate::osrm::{OptimizedTrip, TripError};
use crate::polyline::Polyline;
use crate::traits::{RouteStop, TripService};

/// Habitat for Humanity ReStore, 44 Great Northern Rd, Sault Ste. Marie ON.
pub const DEFAULT_DEPOT: Coordinate = Coordinate::new(46.5240, -84.3170);

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Start and implicit return point of every route.
    pub depot: Coordinate,
    /// Speed used to estimate fallback durations, meters per second.
    /// Non-finite or non-positive values are replaced by the default.
    pub average_speed_mps: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            depot: DEFAULT_DEPOT,
            average_speed_mps: FALLBACK_SPEED_MPS,
        }
    }
}

/// Ordered stops for one day plus route totals.
///
/// `ordered_stops` is always a permutation of the stops that entered
/// planning and never contains the depot. `geometry` is latitude-first and
/// only present when the trip service answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult<S> {
    pub ordered_stops: Vec<S>,
    pub geometry: Option<Polyline>,
    /// Meters.
    pub total_distance: f64,
    /// Seconds.
    pub total_duration: f64,
}

impl<S> RouteResult<S> {
    /// Result for zero or one stop: input unchanged, zero totals.
    pub fn trivial(ordered_stops: Vec<S>) -> Self {
        Self {
            ordered_stops,
            geometry: None,
            total_distance: 0.0,
            total_duration: 0.0,
        }
    }
}

/// The trip-service failure that made the planner fall back.
#[derive(Debug)]
pub struct FallbackReason(pub TripError);

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fell back to nearest-neighbor: {}", self.0)
    }
}

/// A route result together with how it was produced.
#[derive(Debug)]
pub struct PlanOutcome<S> {
    pub result: RouteResult<S>,
    /// `Some` when the nearest-neighbor heuristic produced `result`.
    pub fallback: Option<FallbackReason>,
}

impl<S> PlanOutcome<S> {
    pub fn used_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Plans routes from a fixed depot through a trip service.
#[derive(Debug, Clone)]
pub struct RoutePlanner<T> {
    config: PlannerConfig,
    trip_service: T,
}

impl<T: TripService> RoutePlanner<T> {
    pub fn new(mut config: PlannerConfig, trip_service: T) -> Self {
        let speed = usable_speed(config.average_speed_mps);
        if speed != config.average_speed_mps {
            warn!(
                configured = config.average_speed_mps,
                used = speed,
                "unusable fallback speed, using default"
            );
            config.average_speed_mps = speed;
        }
        Self {
            config,
            trip_service,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Orders `stops` into a route from the depot.
    ///
    /// Never fails: trip service errors are logged and replaced by the
    /// nearest-neighbor result.
    pub fn plan_route<S>(&self, stops: &[S]) -> RouteResult<S>
    where
        S: RouteStop + Clone,
    {
        self.plan_route_detailed(stops).result
    }

    /// Like [`plan_route`](Self::plan_route), but also reports whether the
    /// fallback ran and why.
    pub fn plan_route_detailed<S>(&self, stops: &[S]) -> PlanOutcome<S>
    where
        S: RouteStop + Clone,
    {
        let depot = self.config.depot;
        let (coordinates, stops) = planning_input(depot, stops);

        if stops.len() <= 1 {
            return PlanOutcome {
                result: RouteResult::trivial(stops),
                fallback: None,
            };
        }

        let trip = self
            .trip_service
            .optimize_trip(&coordinates)
            .and_then(|trip| order_from_trip(trip, &stops));

        match trip {
            Ok(result) => {
                debug!(
                    stops = result.ordered_stops.len(),
                    total_distance = result.total_distance,
                    total_duration = result.total_duration,
                    "route optimized by trip service"
                );
                PlanOutcome {
                    result,
                    fallback: None,
                }
            }
            Err(err) => {
                warn!(error = %err, "trip service unavailable, falling back to nearest-neighbor");
                PlanOutcome {
                    result: nearest_neighbor_route(depot, &stops, self.config.average_speed_mps),
                    fallback: Some(FallbackReason(err)),
                }
            }
        }
    }
}

/// Plans a route from an explicit depot with the default fallback speed.
pub fn plan_route<T, S>(trip_service: &T, depot: Coordinate, stops: &[S]) -> RouteResult<S>
where
    T: TripService + ?Sized,
    S: RouteStop + Clone,
{
    let config = PlannerConfig {
        depot,
        ..PlannerConfig::default()
    };
    RoutePlanner::new(config, trip_service).plan_route(stops)
}

/// Depot-first coordinate list and the stops that actually enter planning.
fn planning_input<S>(depot: Coordinate, stops: &[S]) -> (Vec<Coordinate>, Vec<S>)
where
    S: RouteStop + Clone,
{
    let mut coordinates = Vec::with_capacity(stops.len() + 1);
    coordinates.push(depot);
    let mut planned = Vec::with_capacity(stops.len());

    for stop in stops {
        match stop.routable_coordinate() {
            Some(coordinate) => {
                coordinates.push(coordinate);
                planned.push(stop.clone());
            }
            None => warn!("skipping stop without a usable coordinate"),
        }
    }

    (coordinates, planned)
}

/// Maps the service's per-input positions back onto `stops`.
///
/// Index 0 of `waypoint_order` is the depot; index `i` is `stops[i - 1]`.
fn order_from_trip<S: Clone>(trip: OptimizedTrip, stops: &[S]) -> Result<RouteResult<S>, TripError> {
    let waypoints = stops.len() + 1;
    if trip.waypoint_order.len() != waypoints {
        return Err(TripError::Malformed(format!(
            "expected {} waypoints, got {}",
            waypoints,
            trip.waypoint_order.len()
        )));
    }

    let mut seen = vec![false; waypoints];
    for &position in &trip.waypoint_order {
        if position >= waypoints || seen[position] {
            return Err(TripError::Malformed(format!(
                "waypoint positions are not a permutation: {:?}",
                trip.waypoint_order
            )));
        }
        seen[position] = true;
    }

    if !(trip.distance >= 0.0 && trip.duration >= 0.0) {
        return Err(TripError::Malformed(format!(
            "negative or missing totals: distance {}, duration {}",
            trip.distance, trip.duration
        )));
    }

    let mut by_position: Vec<(usize, usize)> = trip
        .waypoint_order
        .iter()
        .enumerate()
        .skip(1)
        .map(|(input_idx, &position)| (position, input_idx - 1))
        .collect();
    by_position.sort_unstable_by_key(|&(position, _)| position);

    Ok(RouteResult {
        ordered_stops: by_position
            .into_iter()
            .map(|(_, stop_idx)| stops[stop_idx].clone())
            .collect(),
        geometry: trip.geometry,
        total_distance: trip.distance,
        total_duration: trip.duration,
    })
}
