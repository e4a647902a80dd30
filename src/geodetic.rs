//! Geodetic point to body-fixed direction, resolved through the ephemeris service.

use frames_core::vector::{self, Vector3};
use frames_ephem::{EphemerisError, EphemerisSource, direction_from_service};
use log::{debug, info, warn};

use crate::completion::{Completion, CompletionSender, spawn_request};

/// A latitude/longitude pair in degrees. Both components are finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticQuery {
    pub lat: f64,
    pub lon: f64,
}

impl GeodeticQuery {
    /// `None` unless both components are finite. Ranges are not checked.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        (lat.is_finite() && lon.is_finite()).then_some(Self { lat, lon })
    }

    /// Parse text inputs the way the lat/lon fields are read.
    pub fn parse(lat: &str, lon: &str) -> Option<Self> {
        let lat = lat.trim().parse::<f64>().ok()?;
        let lon = lon.trim().parse::<f64>().ok()?;
        Self::new(lat, lon)
    }
}

/// What happened to a completed resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    Applied(Vector3),
    /// A newer request already settled; this answer was discarded.
    Stale,
    Failed(String),
}

/// Holds the latest body-fixed direction for the queried surface point.
#[derive(Debug)]
pub struct GeodeticDirectionResolver<S> {
    source: S,
    issued: u64,
    settled: u64,
    direction: Option<Vector3>,
    last_query: Option<GeodeticQuery>,
    resolved_query: Option<GeodeticQuery>,
}

impl<S: EphemerisSource> GeodeticDirectionResolver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            issued: 0,
            settled: 0,
            direction: None,
            last_query: None,
            resolved_query: None,
        }
    }

    /// Issue a request for `(lat, lon)`. Returns the request generation, or
    /// `None` if the input was rejected and nothing was sent.
    pub fn resolve(&mut self, lat: f64, lon: f64, tx: &CompletionSender) -> Option<u64> {
        let Some(query) = GeodeticQuery::new(lat, lon) else {
            debug!("skipping geodetic resolution for non-finite input ({lat}, {lon})");
            return None;
        };
        self.issued += 1;
        let generation = self.issued;
        self.last_query = Some(query);

        let source = self.source.clone();
        spawn_request(tx, async move {
            let result = source.ecef_position(query.lat, query.lon).await;
            Completion::Direction {
                generation,
                query,
                result,
            }
        });
        Some(generation)
    }

    /// Apply a finished request.
    ///
    /// The newest issued request wins: once generation `g` has settled
    /// (successfully or not), answers for generations below `g` are dropped.
    pub fn apply(
        &mut self,
        generation: u64,
        query: GeodeticQuery,
        result: Result<Vector3, EphemerisError>,
    ) -> ResolveOutcome {
        if generation < self.settled {
            debug!(
                "discarding stale direction for ({}, {}): generation {generation} < {}",
                query.lat, query.lon, self.settled
            );
            return ResolveOutcome::Stale;
        }
        self.settled = generation;

        match result.and_then(|raw| direction_from_service(&raw)) {
            Ok(direction) => {
                info!(
                    "surface direction for ({}, {}) = [{:.6}, {:.6}, {:.6}]",
                    query.lat, query.lon, direction[0], direction[1], direction[2]
                );
                self.direction = Some(direction);
                self.resolved_query = Some(query);
                ResolveOutcome::Applied(direction)
            }
            Err(err) => {
                warn!(
                    "could not resolve direction for ({}, {}): {err}; keeping previous",
                    query.lat, query.lon
                );
                ResolveOutcome::Failed(err.to_string())
            }
        }
    }

    /// Last successfully resolved unit direction, in body-fixed scene axes.
    pub fn direction(&self) -> Option<Vector3> {
        self.direction
    }

    /// Where the surface marker sits on a sphere of `radius`.
    pub fn surface_point(&self, radius: f64) -> Option<Vector3> {
        self.direction.map(|d| vector::scale(&d, radius))
    }

    /// End of the line drawn from the origin toward the surface point.
    pub fn line_endpoint(&self, length: f64) -> Option<Vector3> {
        self.direction.map(|d| vector::scale(&d, length))
    }

    /// Most recently submitted query, resolved or not.
    pub fn last_query(&self) -> Option<GeodeticQuery> {
        self.last_query
    }

    /// Query that produced the current direction.
    pub fn resolved_query(&self) -> Option<GeodeticQuery> {
        self.resolved_query
    }

    /// Number of requests issued so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }
}
