//! Mapbox outbound adapter.
//!
//! Implements the `Geocoder` port against the Mapbox geocoding v5 API.

mod dto;
mod http_geocoder;

pub use http_geocoder::{MapboxConfig, MapboxGeocoder};
