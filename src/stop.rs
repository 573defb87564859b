//! Scheduled pickup/delivery stops.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::traits::RouteStop;

/// Whether a stop collects donations or drops them off.
///
/// Informational only; it never affects ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopCategory {
    #[default]
    Pickup,
    Delivery,
}

/// Geocoding progress for a stop's address.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum GeocodeState {
    /// Not geocoded yet.
    #[default]
    Pending,
    /// Geocoding ran and found no match. Not retried.
    Failed,
    Located(Coordinate),
}

impl GeocodeState {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            GeocodeState::Located(coordinate) => Some(*coordinate),
            GeocodeState::Pending | GeocodeState::Failed => None,
        }
    }
}

/// One scheduled pickup or delivery.
///
/// Descriptive fields are carried through planning untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    #[serde(default)]
    pub geocode: GeocodeState,
    #[serde(default)]
    pub category: StopCategory,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub items: Vec<String>,
}

impl Stop {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            geocode: GeocodeState::Pending,
            category: StopCategory::Pickup,
            name: String::new(),
            address: String::new(),
            items: Vec::new(),
        }
    }

    pub fn located(mut self, lat: f64, lng: f64) -> Self {
        self.geocode = GeocodeState::Located(Coordinate::new(lat, lng));
        self
    }

    pub fn with_category(mut self, category: StopCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_items<I, T>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    /// Only stops that were never attempted are sent to the geocoder.
    pub fn needs_geocoding(&self) -> bool {
        self.geocode == GeocodeState::Pending
    }

    pub fn is_routable(&self) -> bool {
        self.geocode
            .coordinate()
            .is_some_and(|coordinate| coordinate.is_valid())
    }
}

impl RouteStop for Stop {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn coordinate(&self) -> Option<Coordinate> {
        self.geocode.coordinate()
    }
}

/// Keeps the stops that can enter planning, preserving input order.
pub fn routable_stops(stops: &[Stop]) -> Vec<Stop> {
    stops
        .iter()
        .filter(|stop| stop.is_routable())
        .cloned()
        .collect()
}
