//! Driving port for place search and reverse geocoding.
use async_trait::async_trait;

use crate::domain::{Coordinates, Error, Place, PlaceQuery};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeocodingQuery: Send + Sync {
    /// Places matching free text.
    async fn search(&self, query: PlaceQuery) -> Result<Vec<Place>, Error>;

    /// A label for a point. Falls back to the formatted coordinates when the
    /// provider fails or knows no name, so this never errors.
    async fn reverse(&self, point: Coordinates) -> String;
}
