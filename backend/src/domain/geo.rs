//! Coordinates and geocoded places.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors for coordinates and search text.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoValidationError {
    LatitudeOutOfRange { value: f64 },
    LongitudeOutOfRange { value: f64 },
    EmptyQuery,
}

impl fmt::Display for GeoValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LatitudeOutOfRange { value } => {
                write!(f, "latitude must be within [-90, 90], got {value}")
            }
            Self::LongitudeOutOfRange { value } => {
                write!(f, "longitude must be within [-180, 180], got {value}")
            }
            Self::EmptyQuery => write!(f, "search query must not be empty"),
        }
    }
}

impl std::error::Error for GeoValidationError {}

/// WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Validate a latitude/longitude pair.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoValidationError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoValidationError::LatitudeOutOfRange { value: latitude });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoValidationError::LongitudeOutOfRange { value: longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Label used when no place name can be resolved.
    ///
    /// # Examples
    /// ```
    /// use cleanbee::domain::Coordinates;
    ///
    /// let point = Coordinates::new(51.5, -0.1276).expect("valid point");
    /// assert_eq!(point.fallback_label(), "51.500000, -0.127600");
    /// ```
    pub fn fallback_label(&self) -> String {
        format!("{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Forward-geocoding search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceQuery(String);

impl PlaceQuery {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, GeoValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(GeoValidationError::EmptyQuery);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PlaceQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Named place returned by a geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub name: String,
    pub coordinates: Coordinates,
}
