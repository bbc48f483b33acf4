//! Driven port for place lookups.
use async_trait::async_trait;

use crate::domain::{Coordinates, Place, PlaceQuery};

use super::define_port_error;

define_port_error! {
    /// Errors raised by geocoder adapters.
    pub enum GeocoderError {
        /// The provider could not be reached.
        Transport { message: String } => "geocoder transport failed: {message}",
        /// The provider did not answer in time.
        Timeout { message: String } => "geocoder timed out: {message}",
        /// The provider throttled the call.
        RateLimited { message: String } => "geocoder rate limited: {message}",
        /// The provider answered with an unreadable payload.
        Decode { message: String } => "geocoder response malformed: {message}",
        /// The provider rejected the request.
        InvalidRequest { message: String } => "geocoder rejected request: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Places matching free text, best match first.
    async fn forward(&self, query: &PlaceQuery) -> Result<Vec<Place>, GeocoderError>;

    /// Name of the place at a point, or `None` when the provider knows none.
    async fn reverse(&self, point: &Coordinates) -> Result<Option<String>, GeocoderError>;
}
