//! Place search and reverse geocoding with a coordinate fallback.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{Geocoder, GeocoderError, GeocodingQuery};
use crate::domain::{Coordinates, Error, Place, PlaceQuery};

/// Implements [`GeocodingQuery`].
#[derive(Clone)]
pub struct GeocodingService<G> {
    geocoder: Arc<G>,
}

impl<G> GeocodingService<G> {
    pub fn new(geocoder: Arc<G>) -> Self {
        Self { geocoder }
    }
}

fn map_geocoder_error(error: GeocoderError) -> Error {
    let kind = error.kind();
    match error {
        GeocoderError::Transport { message }
        | GeocoderError::Timeout { message }
        | GeocoderError::RateLimited { message } => {
            Error::service_unavailable(format!("geocoder unavailable: {message}"))
                .with_details(json!({ "reason": kind }))
        }
        GeocoderError::Decode { message } => {
            Error::bad_gateway(format!("geocoder returned an unreadable answer: {message}"))
        }
        GeocoderError::InvalidRequest { message } => {
            Error::invalid_request(format!("geocoder rejected the query: {message}"))
        }
    }
}

#[async_trait]
impl<G> GeocodingQuery for GeocodingService<G>
where
    G: Geocoder,
{
    async fn search(&self, query: PlaceQuery) -> Result<Vec<Place>, Error> {
        self.geocoder
            .forward(&query)
            .await
            .map_err(map_geocoder_error)
    }

    async fn reverse(&self, point: Coordinates) -> String {
        match self.geocoder.reverse(&point).await {
            Ok(Some(name)) if !name.trim().is_empty() => name,
            Ok(_) => point.fallback_label(),
            Err(err) => {
                warn!(
                    error = %err,
                    error_kind = err.kind(),
                    "reverse geocoding fell back to coordinates"
                );
                point.fallback_label()
            }
        }
    }
}
