//! Location Resolution Module
//!
//! Turns "no input" into the caller's IP location, and explicit coordinates
//! into a named [`Location`] without consulting the IP lookup.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::Result;
use crate::geolocation::GeoLocator;
use crate::models::{Coordinates, Location};

/// Service for resolving optional coordinates into a location
#[derive(Clone)]
pub struct LocationResolver {
    locator: Arc<dyn GeoLocator>,
    reverse_geocode: bool,
}

impl LocationResolver {
    #[must_use]
    pub fn new(locator: Arc<dyn GeoLocator>, reverse_geocode: bool) -> Self {
        Self {
            locator,
            reverse_geocode,
        }
    }

    /// Resolve explicit coordinates, or fall back to the IP lookup.
    ///
    /// IP lookup failures surface as `LocationUnavailable`; naming explicit
    /// coordinates never fails.
    #[instrument(skip(self))]
    pub async fn resolve(&self, coordinates: Option<Coordinates>) -> Result<Location> {
        let location = match coordinates {
            Some(coordinates) => self.resolve_coordinates(coordinates).await,
            None => self.locator.locate_by_ip().await?,
        };

        debug!(
            "Resolved location: {} at ({}, {})",
            location.label(),
            location.latitude,
            location.longitude
        );
        Ok(location)
    }

    /// IP lookup only, for the location endpoint
    pub async fn resolve_by_ip(&self) -> Result<Location> {
        self.locator.locate_by_ip().await
    }

    async fn resolve_coordinates(&self, coordinates: Coordinates) -> Location {
        if !self.reverse_geocode {
            return Location::unnamed(coordinates);
        }

        match self.locator.place_name(coordinates).await {
            Ok(Some((city, country))) => Location::new(coordinates, city, country),
            Ok(None) => {
                debug!("No reverse geocoding result, using unnamed location");
                Location::unnamed(coordinates)
            }
            Err(e) => {
                debug!("Reverse geocoding failed: {}, using unnamed location", e);
                Location::unnamed(coordinates)
            }
        }
    }
}
