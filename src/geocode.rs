//! Geocoding seam and its rate-limiting discipline.
//!
//! The HTTP geocoder itself lives with the embedding app; this module only
//! decides how answers turn into stop state and keeps every request spaced
//! through a shared [`RateLimiter`].

use std::fmt;

use tracing::{debug, warn};

use crate::coordinate::Coordinate;
use crate::rate_limit::RateLimiter;
use crate::stop::{GeocodeState, Stop};
use crate::traits::Geocoder;

/// A postal address to resolve, restricted to one country's results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeQuery {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    /// ISO 3166-1 alpha-2 code results are limited to.
    pub country_code: String,
}

impl GeocodeQuery {
    pub fn new(
        address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            city: city.into(),
            state: state.into(),
            zip: zip.into(),
            country_code: "ca".to_string(),
        }
    }

    /// Free-text form sent to the geocoder: `address, city, state zip`.
    pub fn text(&self) -> String {
        let region = [self.state.trim(), self.zip.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        [self.address.trim(), self.city.trim(), region.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Failure reported by a [`Geocoder`].
///
/// The crate never builds `Http` itself; it exists for `Geocoder`
/// implementors backed by `reqwest`, who can use `?` on transport errors.
#[derive(Debug)]
pub enum GeocodeError {
    Http(reqwest::Error),
    Other(String),
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeError::Http(err) => write!(f, "geocoding request failed: {}", err),
            GeocodeError::Other(reason) => write!(f, "geocoding failed: {}", reason),
        }
    }
}

impl std::error::Error for GeocodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeocodeError::Http(err) => Some(err),
            GeocodeError::Other(_) => None,
        }
    }
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        GeocodeError::Http(err)
    }
}

/// Wraps a geocoder so every call first waits for a rate-limiter slot.
#[derive(Debug)]
pub struct RateLimitedGeocoder<G> {
    inner: G,
    limiter: RateLimiter,
}

impl<G: Geocoder> RateLimitedGeocoder<G> {
    pub fn new(inner: G, limiter: RateLimiter) -> Self {
        Self { inner, limiter }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

impl<G: Geocoder> Geocoder for RateLimitedGeocoder<G> {
    fn geocode(&self, query: &GeocodeQuery) -> Result<Option<Coordinate>, GeocodeError> {
        self.limiter.acquire();
        self.inner.geocode(query)
    }
}

/// Geocodes one stop and records the outcome on it.
///
/// A match locates the stop, no match marks it failed so it is not retried,
/// and an error leaves it pending.
pub fn geocode_stop<G>(geocoder: &G, stop: &mut Stop, query: &GeocodeQuery) -> GeocodeState
where
    G: Geocoder + ?Sized,
{
    match geocoder.geocode(query) {
        Ok(Some(coordinate)) => {
            debug!(stop = %stop.id, "stop geocoded");
            stop.geocode = GeocodeState::Located(coordinate);
        }
        Ok(None) => {
            warn!(stop = %stop.id, query = %query.text(), "no geocoding match");
            stop.geocode = GeocodeState::Failed;
        }
        Err(err) => {
            warn!(stop = %stop.id, error = %err, "geocoding error");
        }
    }
    stop.geocode
}

/// Geocodes every stop that has not been attempted yet, in order.
///
/// Returns how many stops ended up located.
pub fn geocode_pending<G, F>(geocoder: &G, stops: &mut [Stop], query_for: F) -> usize
where
    G: Geocoder + ?Sized,
    F: Fn(&Stop) -> GeocodeQuery,
{
    let mut located = 0;
    for stop in stops.iter_mut().filter(|stop| stop.needs_geocoding()) {
        let query = query_for(&*stop);
        if let GeocodeState::Located(_) = geocode_stop(geocoder, stop, &query) {
            located += 1;
        }
    }
    located
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::time::{Duration, Instant};

    struct ScriptedGeocoder {
        answers: RefCell<Vec<Result<Option<Coordinate>, GeocodeError>>>,
        calls: RefCell<Vec<Instant>>,
    }

    impl ScriptedGeocoder {
        fn new(answers: Vec<Result<Option<Coordinate>, GeocodeError>>) -> Self {
            Self {
                answers: RefCell::new(answers),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Geocoder for ScriptedGeocoder {
        fn geocode(&self, _query: &GeocodeQuery) -> Result<Option<Coordinate>, GeocodeError> {
            self.calls.borrow_mut().push(Instant::now());
            self.answers.borrow_mut().remove(0)
        }
    }

    fn query() -> GeocodeQuery {
        GeocodeQuery::new("44 Great Northern Rd", "Sault Ste. Marie", "ON", "P6B 4Y5")
    }

    #[test]
    fn test_query_text() {
        assert_eq!(
            query().text(),
            "44 Great Northern Rd, Sault Ste. Marie, ON P6B 4Y5"
        );
        assert_eq!(query().country_code, "ca");
    }

    #[test]
    fn test_query_text_skips_blank_parts() {
        let query = GeocodeQuery::new("12 Queen St E", "", "ON", "");
        assert_eq!(query.text(), "12 Queen St E, ON");
    }

    #[test]
    fn test_match_locates_stop() {
        let geocoder = ScriptedGeocoder::new(vec![Ok(Some(Coordinate::new(46.524, -84.317)))]);
        let mut stop = Stop::new("s1");

        let state = geocode_stop(&geocoder, &mut stop, &query());
        assert_eq!(state, GeocodeState::Located(Coordinate::new(46.524, -84.317)));
        assert!(stop.is_routable());
    }

    #[test]
    fn test_no_match_marks_failed() {
        let geocoder = ScriptedGeocoder::new(vec![Ok(None)]);
        let mut stop = Stop::new("s1");

        geocode_stop(&geocoder, &mut stop, &query());
        assert_eq!(stop.geocode, GeocodeState::Failed);
        assert!(!stop.needs_geocoding());
    }

    #[test]
    fn test_error_leaves_stop_pending() {
        let geocoder = ScriptedGeocoder::new(vec![Err(GeocodeError::Other("boom".to_string()))]);
        let mut stop = Stop::new("s1");

        geocode_stop(&geocoder, &mut stop, &query());
        assert_eq!(stop.geocode, GeocodeState::Pending);
    }

    #[test]
    fn test_geocode_pending_skips_attempted_stops() {
        let geocoder = ScriptedGeocoder::new(vec![
            Ok(Some(Coordinate::new(46.53, -84.32))),
            Ok(None),
        ]);
        let mut failed = Stop::new("failed");
        failed.geocode = GeocodeState::Failed;
        let mut stops = vec![
            Stop::new("a"),
            Stop::new("done").located(46.50, -84.30),
            failed,
            Stop::new("b"),
        ];

        let located = geocode_pending(&geocoder, &mut stops, |_| query());
        assert_eq!(located, 1);
        assert_eq!(geocoder.calls.borrow().len(), 2);
        assert!(stops[0].is_routable());
        assert_eq!(stops[3].geocode, GeocodeState::Failed);
    }

    #[test]
    fn test_rate_limited_geocoder_spaces_calls() {
        let interval = Duration::from_millis(40);
        let geocoder = RateLimitedGeocoder::new(
            ScriptedGeocoder::new(vec![Ok(None), Ok(None)]),
            RateLimiter::new(interval),
        );

        let start = Instant::now();
        geocoder.geocode(&query()).expect("first");
        geocoder.geocode(&query()).expect("second");

        let calls = geocoder.inner().calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].duration_since(start) >= interval);
    }
}
