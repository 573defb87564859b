//! Nearest-neighbor ordering over great-circle distance.
//!
//! Starting from the depot, greedily visits the closest unvisited stop.
//! Deterministic for a given input order: ties go to the stop that appears
//! first in the remaining pool.
//!
//! # Complexity
//!
//! O(n²) in the number of stops, fine for a day's worth of pickups.

use tracing::debug;

use crate::coordinate::Coordinate;
use crate::haversine::haversine_meters;
use crate::planner::RouteResult;
use crate::traits::RouteStop;

/// Assumed average in-town driving speed in meters per second (~30 mph).
///
/// Fallback durations are `distance / speed`. This is a rough
/// approximation, not a measured travel time.
pub const FALLBACK_SPEED_MPS: f64 = 13.4;

/// Speeds that are not finite and positive are replaced by
/// [`FALLBACK_SPEED_MPS`] so durations stay non-negative.
pub fn usable_speed(average_speed_mps: f64) -> f64 {
    if average_speed_mps.is_finite() && average_speed_mps > 0.0 {
        average_speed_mps
    } else {
        FALLBACK_SPEED_MPS
    }
}

/// Orders `stops` greedily from `depot`.
///
/// Stops without a valid coordinate are skipped. No road geometry is
/// produced, and the duration is derived from `average_speed_mps`.
pub fn nearest_neighbor_route<S>(
    depot: Coordinate,
    stops: &[S],
    average_speed_mps: f64,
) -> RouteResult<S>
where
    S: RouteStop + Clone,
{
    let mut remaining: Vec<(Coordinate, &S)> = stops
        .iter()
        .filter_map(|stop| stop.routable_coordinate().map(|coordinate| (coordinate, stop)))
        .collect();

    let mut ordered_stops = Vec::with_capacity(remaining.len());
    let mut current = depot;
    let mut total_distance = 0.0;

    while !remaining.is_empty() {
        let mut nearest_idx = 0;
        let mut nearest_dist = f64::INFINITY;

        for (idx, (coordinate, _)) in remaining.iter().enumerate() {
            let dist = haversine_meters(current, *coordinate);
            if dist < nearest_dist {
                nearest_dist = dist;
                nearest_idx = idx;
            }
        }

        let (coordinate, stop) = remaining.remove(nearest_idx);
        total_distance += nearest_dist;
        current = coordinate;
        ordered_stops.push(stop.clone());
    }

    debug!(
        stops = ordered_stops.len(),
        total_distance,
        "nearest-neighbor route built"
    );

    RouteResult {
        ordered_stops,
        geometry: None,
        total_distance,
        total_duration: total_distance / usable_speed(average_speed_mps),
    }
}
