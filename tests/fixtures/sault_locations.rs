//! Sault Ste. Marie, ON locations for routing fixtures.
//!
//! Coordinates are approximate street-level positions.

#![allow(dead_code)]

use pickup_route_planner::{Coordinate, Stop, StopCategory};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    /// A located pickup stop at this location, keyed by `id`.
    pub fn pickup(&self, id: &str) -> Stop {
        Stop::new(id)
            .located(self.lat, self.lng)
            .with_name(self.name)
            .with_category(StopCategory::Pickup)
    }
}

pub const DEPOT: Location = Location::new("ReStore, 44 Great Northern Rd", 46.5240, -84.3170);

pub const STOPS: &[Location] = &[
    Location::new("Station Mall", 46.5107, -84.3357),
    Location::new("Sault College", 46.5322, -84.3136),
    Location::new("Algoma University", 46.5286, -84.3577),
    Location::new("Bellevue Park", 46.4951, -84.2962),
    Location::new("Sault Area Hospital", 46.5340, -84.3185),
    Location::new("Strathclair Park", 46.5461, -84.3434),
    Location::new("Queen St E & Pim St", 46.5089, -84.3225),
    Location::new("Northern Community Centre", 46.5499, -84.3068),
];

/// The three-stop scenario used across planner tests.
pub fn scenario_stops() -> Vec<Stop> {
    vec![
        Stop::new("A").located(46.53, -84.32).with_name("Pickup A"),
        Stop::new("B")
            .located(46.50, -84.30)
            .with_name("Delivery B")
            .with_category(StopCategory::Delivery),
        Stop::new("C")
            .located(46.55, -84.35)
            .with_name("Pickup C")
            .with_items(["sofa", "dresser"]),
    ]
}

/// Every fixture location as a pickup stop, in table order.
pub fn all_stops() -> Vec<Stop> {
    STOPS
        .iter()
        .enumerate()
        .map(|(idx, location)| location.pickup(&format!("stop-{}", idx)))
        .collect()
}
