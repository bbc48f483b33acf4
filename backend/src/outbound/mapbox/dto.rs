//! DTOs for decoding Mapbox geocoding responses.

use serde::Deserialize;

use crate::domain::{Coordinates, Place};

#[derive(Debug, Deserialize)]
pub(super) struct FeatureCollectionDto {
    #[serde(default)]
    features: Vec<FeatureDto>,
}

#[derive(Debug, Deserialize)]
struct FeatureDto {
    place_name: Option<String>,
    /// `[longitude, latitude]`.
    center: Option<[f64; 2]>,
}

impl FeatureCollectionDto {
    /// Every feature as a domain place, preserving relevance order.
    pub(super) fn into_places(self) -> Result<Vec<Place>, String> {
        self.features
            .into_iter()
            .enumerate()
            .map(|(index, feature)| feature.into_place(index))
            .collect()
    }

    /// Name of the most relevant feature.
    pub(super) fn into_first_name(self) -> Option<String> {
        self.features
            .into_iter()
            .next()
            .and_then(|feature| feature.place_name)
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
    }
}

impl FeatureDto {
    fn into_place(self, index: usize) -> Result<Place, String> {
        let name = self
            .place_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| format!("feature {index} has no place_name"))?;
        let [longitude, latitude] = self
            .center
            .ok_or_else(|| format!("feature {index} has no center"))?;
        let coordinates = Coordinates::new(latitude, longitude)
            .map_err(|err| format!("feature {index}: {err}"))?;
        Ok(Place { name, coordinates })
    }
}
