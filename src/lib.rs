//! pickup-route-planner
//!
//! Orders a day's pickup/delivery stops into a route starting at the depot,
//! using an OSRM trip service with a nearest-neighbor fallback.

pub mod traits;
pub mod coordinate;
pub mod stop;
pub mod haversine;
pub mod nearest_neighbor;
pub mod polyline;
pub mod osrm;
pub mod planner;
pub mod rate_limit;
pub mod geocode;

pub use coordinate::Coordinate;
pub use planner::{plan_route, PlanOutcome, PlannerConfig, RoutePlanner, RouteResult};
pub use stop::{routable_stops, GeocodeState, Stop, StopCategory};
