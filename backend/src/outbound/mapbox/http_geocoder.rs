//! Reqwest-backed Mapbox geocoder.
//!
//! The access token travels as a query parameter, so transport errors are
//! stripped of their URL before they reach logs or callers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use zeroize::Zeroizing;

use super::dto::FeatureCollectionDto;
use crate::domain::ports::{Geocoder, GeocoderError};
use crate::domain::{Coordinates, Place, PlaceQuery};
use crate::outbound::http_status::{UpstreamFailure, status_message};

const FORWARD_RESULT_LIMIT: &str = "5";

/// Connection settings for the Mapbox API.
pub struct MapboxConfig {
    /// Base URL, for example `https://api.mapbox.com`.
    pub endpoint: Url,
    pub access_token: Zeroizing<String>,
    pub timeout: Duration,
}

/// `Geocoder` backed by `mapbox.places`.
pub struct MapboxGeocoder {
    client: Client,
    endpoint: Url,
    access_token: Zeroizing<String>,
}

impl MapboxGeocoder {
    /// Build a geocoder with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: MapboxConfig) -> Result<Self, GeocoderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| GeocoderError::transport(err.without_url().to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint,
            access_token: config.access_token,
        })
    }

    async fn fetch(&self, url: Url) -> Result<FeatureCollectionDto, GeocoderError> {
        let response = self
            .client
            .get(url)
            .query(&[("access_token", self.access_token.as_str())])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        serde_json::from_slice(body.as_ref()).map_err(|err| {
            GeocoderError::decode(format!("invalid geocoding payload: {err}"))
        })
    }
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    async fn forward(&self, query: &PlaceQuery) -> Result<Vec<Place>, GeocoderError> {
        let mut url = places_url(&self.endpoint, query.as_ref())?;
        url.query_pairs_mut()
            .append_pair("limit", FORWARD_RESULT_LIMIT);
        let collection = self.fetch(url).await?;
        collection.into_places().map_err(GeocoderError::decode)
    }

    async fn reverse(&self, point: &Coordinates) -> Result<Option<String>, GeocoderError> {
        let url = places_url(&self.endpoint, &reverse_search_text(point))?;
        let collection = self.fetch(url).await?;
        Ok(collection.into_first_name())
    }
}

/// Mapbox expects `longitude,latitude`.
fn reverse_search_text(point: &Coordinates) -> String {
    format!("{},{}", point.longitude(), point.latitude())
}

fn places_url(endpoint: &Url, search_text: &str) -> Result<Url, GeocoderError> {
    let file = format!("{search_text}.json");
    let mut url = endpoint.clone();
    url.path_segments_mut()
        .map_err(|()| GeocoderError::invalid_request("endpoint cannot be a base URL"))?
        .pop_if_empty()
        .extend(["geocoding", "v5", "mapbox.places", file.as_str()]);
    Ok(url)
}

fn map_transport_error(error: reqwest::Error) -> GeocoderError {
    let timed_out = error.is_timeout();
    let message = error.without_url().to_string();
    if timed_out {
        GeocoderError::timeout(message)
    } else {
        GeocoderError::transport(message)
    }
}

fn map_status_error(status: reqwest::StatusCode, body: &[u8]) -> GeocoderError {
    let message = status_message(status, body);
    match UpstreamFailure::from_status(status) {
        UpstreamFailure::RateLimited => GeocoderError::rate_limited(message),
        UpstreamFailure::Timeout => GeocoderError::timeout(message),
        UpstreamFailure::InvalidRequest => GeocoderError::invalid_request(message),
        UpstreamFailure::Transport => GeocoderError::transport(message),
    }
}
