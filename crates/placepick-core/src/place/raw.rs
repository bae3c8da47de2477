use serde::{Deserialize, Serialize};

use crate::geo::{RawBounds, RawCoordinate};

use super::details::{AddressComponent, Attributions, OpeningHours, PhotoMetadata, PlusCode};

/// Place data exactly as a data source supplied it, before validation.
///
/// Every field is optional here; [`PlaceEntity::from_raw`](super::PlaceEntity::from_raw)
/// decides which absences and values are acceptable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPlaceData {
    pub identifier: Option<String>,
    pub name: Option<String>,
    pub coordinate: Option<RawCoordinate>,
    pub phone_number: Option<String>,
    pub formatted_address: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f32>,
    pub user_ratings_total: Option<i64>,
    pub price_level: Option<i64>,
    pub types: Vec<String>,
    pub attributions: Option<Attributions>,
    pub viewport: Option<RawBounds>,
    pub address_components: Option<Vec<AddressComponent>>,
    pub plus_code: Option<PlusCode>,
    pub opening_hours: Option<OpeningHours>,
    pub photos: Option<Vec<PhotoMetadata>>,
}

impl RawPlaceData {
    /// Raw data carrying only a coordinate.
    #[must_use]
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            coordinate: Some(RawCoordinate {
                latitude,
                longitude,
            }),
            ..Self::default()
        }
    }

    /// Case-insensitive substring match against the name and formatted address.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [self.name.as_deref(), self.formatted_address.as_deref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}
