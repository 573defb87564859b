//! OSRM HTTP adapter for trip optimization.
//!
//! Speaks the `trip` service: one-way, source fixed to the first coordinate,
//! full GeoJSON geometry. This is the only place coordinates are flipped to
//! OSRM's longitude-first order.

use std::env;
use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::coordinate::Coordinate;
use crate::polyline::Polyline;
use crate::traits::TripService;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    /// Request timeout. `None` keeps the HTTP client's default.
    pub timeout_secs: Option<u64>,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout_secs: None,
        }
    }
}

impl OsrmConfig {
    /// Defaults overridden by `OSRM_BASE_URL`, `OSRM_PROFILE` and
    /// `OSRM_TIMEOUT_SECS` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(base_url) = lookup("OSRM_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(profile) = lookup("OSRM_PROFILE") {
            config.profile = profile;
        }
        if let Some(value) = lookup("OSRM_TIMEOUT_SECS") {
            match value.trim().parse() {
                Ok(secs) => config.timeout_secs = Some(secs),
                Err(_) => warn!(value = %value, "ignoring unparsable OSRM_TIMEOUT_SECS"),
            }
        }
        config
    }
}

/// Why a trip request produced no usable answer.
#[derive(Debug)]
pub enum TripError {
    /// Transport failure: connection refused, timeout, TLS, etc.
    Http(reqwest::Error),
    /// The service answered with a non-`Ok` code.
    Status(String),
    /// The body could not be understood.
    Malformed(String),
}

impl fmt::Display for TripError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripError::Http(err) => write!(f, "trip request failed: {}", err),
            TripError::Status(code) => write!(f, "trip service returned {}", code),
            TripError::Malformed(reason) => write!(f, "malformed trip response: {}", reason),
        }
    }
}

impl std::error::Error for TripError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TripError::Http(err) => Some(err),
            TripError::Status(_) | TripError::Malformed(_) => None,
        }
    }
}

impl From<reqwest::Error> for TripError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TripError::Malformed(err.to_string())
        } else {
            TripError::Http(err)
        }
    }
}

/// A trip as answered by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedTrip {
    /// For each input coordinate (same order as the request), its position
    /// in the optimized visiting order.
    pub waypoint_order: Vec<usize>,
    pub geometry: Option<Polyline>,
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    pub(crate) fn trip_url(&self, coordinates: &[Coordinate]) -> String {
        let coords = coordinates
            .iter()
            .map(|coordinate| coordinate.to_osrm_param())
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/trip/v1/{}/{}?overview=full&geometries=geojson&roundtrip=false&source=first",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }
}

impl TripService for OsrmClient {
    fn optimize_trip(&self, coordinates: &[Coordinate]) -> Result<OptimizedTrip, TripError> {
        let url = self.trip_url(coordinates);
        debug!(coordinates = coordinates.len(), "requesting OSRM trip");

        let response = self.client.get(url).send()?;
        let status = response.status();
        let body = match response.json::<OsrmTripResponse>() {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(TripError::Status(format!("HTTP {}", status)));
            }
            Err(err) => return Err(err.into()),
        };

        body.into_trip(coordinates.len())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmTripResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    trips: Vec<OsrmTrip>,
    #[serde(default)]
    waypoints: Vec<OsrmWaypoint>,
}

#[derive(Debug, Deserialize)]
struct OsrmTrip {
    distance: f64,
    duration: f64,
    #[serde(default)]
    geometry: Option<OsrmGeometry>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmWaypoint {
    waypoint_index: usize,
}

impl OsrmTripResponse {
    pub(crate) fn into_trip(self, expected_waypoints: usize) -> Result<OptimizedTrip, TripError> {
        if self.code != "Ok" {
            return Err(TripError::Status(match self.message {
                Some(message) => format!("{}: {}", self.code, message),
                None => self.code,
            }));
        }

        if self.waypoints.len() != expected_waypoints {
            return Err(TripError::Malformed(format!(
                "expected {} waypoints, got {}",
                expected_waypoints,
                self.waypoints.len()
            )));
        }

        let trip = self
            .trips
            .into_iter()
            .next()
            .ok_or_else(|| TripError::Malformed("response contains no trip".to_string()))?;

        Ok(OptimizedTrip {
            waypoint_order: self
                .waypoints
                .iter()
                .map(|waypoint| waypoint.waypoint_index)
                .collect(),
            geometry: trip
                .geometry
                .map(|geometry| Polyline::from_lng_lat(&geometry.coordinates)),
            distance: trip.distance,
            duration: trip.duration,
        })
    }
}
