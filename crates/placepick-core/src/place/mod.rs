//! The immutable place model.
//!
//! A [`PlaceEntity`] is a validated snapshot of everything known about a
//! physical place. The only way to obtain one is [`PlaceEntity::from_raw`]
//! (deserialization routes through it too); there are no mutators, so an
//! "updated" place is a new entity built from [`PlaceEntity::to_raw`].

pub mod details;
pub mod raw;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::geo::{Coordinate, CoordinateBounds};

pub use details::{
    AddressComponent, AttributionLink, Attributions, DayTime, OpenNowStatus, OpeningHours,
    Period, PhotoMetadata, PhotoSize, PlusCode, PriceLevel,
};
pub use raw::RawPlaceData;

/// Sentinel rating for places without enough reviews.
pub const UNRATED: f32 = 0.0;
pub const MIN_RATING: f32 = 1.0;
pub const MAX_RATING: f32 = 5.0;

/// A physical place and its descriptive metadata.
///
/// Whenever any of this data is shown to an end user, [`attributions`](Self::attributions)
/// must be shown with it. The [`Display`](std::fmt::Display) impl does so.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawPlaceData")]
pub struct PlaceEntity {
    identifier: Option<String>,
    name: Option<String>,
    coordinate: Coordinate,
    phone_number: Option<String>,
    formatted_address: Option<String>,
    website: Option<String>,
    rating: f32,
    user_ratings_total: u64,
    price_level: PriceLevel,
    types: Vec<String>,
    attributions: Option<Attributions>,
    viewport: Option<CoordinateBounds>,
    address_components: Option<Vec<AddressComponent>>,
    plus_code: Option<PlusCode>,
    opening_hours: Option<OpeningHours>,
    photos: Option<Vec<PhotoMetadata>>,
    open_now_status: Option<OpenNowStatus>,
}

impl PlaceEntity {
    /// Validates raw provider data and builds a place from it.
    ///
    /// Absent optional fields stay absent. A missing rating becomes
    /// [`UNRATED`], a missing price level [`PriceLevel::Unknown`], and a
    /// missing review count zero.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingCoordinate`] if no coordinate was supplied.
    /// - [`ValidationError::LatitudeOutOfRange`] / [`ValidationError::LongitudeOutOfRange`]
    ///   if the coordinate is outside WGS84 range.
    /// - [`ValidationError::RatingOutOfRange`] unless the rating is `0.0` or within `[1.0, 5.0]`.
    /// - [`ValidationError::NegativeRatingsTotal`] for a negative review count.
    /// - [`ValidationError::UnknownPriceLevel`] for a level outside `-1..=4`.
    /// - [`ValidationError::InvalidViewport`] if a viewport corner is out of range.
    pub fn from_raw(raw: RawPlaceData) -> Result<Self, ValidationError> {
        let coordinate = raw.coordinate.ok_or(ValidationError::MissingCoordinate)?;
        let coordinate = Coordinate::try_from(coordinate)?;
        let rating = validate_rating(raw.rating)?;
        let user_ratings_total = match raw.user_ratings_total {
            None => 0,
            Some(total) => {
                u64::try_from(total).map_err(|_| ValidationError::NegativeRatingsTotal(total))?
            }
        };
        let price_level = raw
            .price_level
            .map(PriceLevel::try_from)
            .transpose()?
            .unwrap_or_default();
        let viewport = raw
            .viewport
            .map(CoordinateBounds::try_from)
            .transpose()?;

        Ok(Self {
            identifier: raw.identifier,
            name: raw.name,
            coordinate,
            phone_number: raw.phone_number,
            formatted_address: raw.formatted_address,
            website: raw.website,
            rating,
            user_ratings_total,
            price_level,
            types: raw.types,
            attributions: raw.attributions,
            viewport,
            address_components: raw.address_components,
            plus_code: raw.plus_code,
            opening_hours: raw.opening_hours,
            photos: raw.photos,
            open_now_status: None,
        })
    }

    /// Returns the raw form of this place, suitable for editing and passing
    /// back through [`from_raw`](Self::from_raw).
    #[must_use]
    pub fn to_raw(&self) -> RawPlaceData {
        RawPlaceData {
            identifier: self.identifier.clone(),
            name: self.name.clone(),
            coordinate: Some(self.coordinate.into()),
            phone_number: self.phone_number.clone(),
            formatted_address: self.formatted_address.clone(),
            website: self.website.clone(),
            rating: Some(self.rating),
            user_ratings_total: Some(i64::try_from(self.user_ratings_total).unwrap_or(i64::MAX)),
            price_level: Some(self.price_level.into()),
            types: self.types.clone(),
            attributions: self.attributions.clone(),
            viewport: self.viewport.map(Into::into),
            address_components: self.address_components.clone(),
            plus_code: self.plus_code.clone(),
            opening_hours: self.opening_hours.clone(),
            photos: self.photos.clone(),
        }
    }

    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Phone number in international format, e.g. `"+61 2 9374 4000"`.
    #[must_use]
    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    #[must_use]
    pub fn formatted_address(&self) -> Option<&str> {
        self.formatted_address.as_deref()
    }

    #[must_use]
    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }

    /// Five-star rating, or [`UNRATED`] (`0.0`).
    #[must_use]
    pub fn rating(&self) -> f32 {
        self.rating
    }

    #[must_use]
    pub fn is_rated(&self) -> bool {
        self.rating >= MIN_RATING
    }

    #[must_use]
    pub fn user_ratings_total(&self) -> u64 {
        self.user_ratings_total
    }

    #[must_use]
    pub fn price_level(&self) -> PriceLevel {
        self.price_level
    }

    #[must_use]
    pub fn types(&self) -> &[String] {
        &self.types
    }

    #[must_use]
    pub fn attributions(&self) -> Option<&Attributions> {
        self.attributions.as_ref()
    }

    #[must_use]
    pub fn viewport(&self) -> Option<&CoordinateBounds> {
        self.viewport.as_ref()
    }

    #[must_use]
    pub fn address_components(&self) -> Option<&[AddressComponent]> {
        self.address_components.as_deref()
    }

    /// First address component tagged with `component_type`, e.g. `"locality"`.
    #[must_use]
    pub fn address_component(&self, component_type: &str) -> Option<&AddressComponent> {
        self.address_components
            .as_deref()?
            .iter()
            .find(|c| c.types.iter().any(|t| t == component_type))
    }

    #[must_use]
    pub fn plus_code(&self) -> Option<&PlusCode> {
        self.plus_code.as_ref()
    }

    #[must_use]
    pub fn opening_hours(&self) -> Option<&OpeningHours> {
        self.opening_hours.as_ref()
    }

    #[must_use]
    pub fn photos(&self) -> Option<&[PhotoMetadata]> {
        self.photos.as_deref()
    }

    /// Always `None`; providers no longer report live open status.
    #[deprecated(note = "open-now status is not populated; use opening_hours instead")]
    #[must_use]
    pub fn open_now_status(&self) -> Option<OpenNowStatus> {
        self.open_now_status
    }

    fn fields_eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
            && self.name == other.name
            && self.coordinate == other.coordinate
            && self.phone_number == other.phone_number
            && self.formatted_address == other.formatted_address
            && self.website == other.website
            && self.rating.to_bits() == other.rating.to_bits()
            && self.user_ratings_total == other.user_ratings_total
            && self.price_level == other.price_level
            && self.types == other.types
            && self.attributions == other.attributions
            && self.viewport == other.viewport
            && self.address_components == other.address_components
            && self.plus_code == other.plus_code
            && self.opening_hours == other.opening_hours
            && self.photos == other.photos
    }
}

fn validate_rating(rating: Option<f32>) -> Result<f32, ValidationError> {
    match rating {
        None => Ok(UNRATED),
        Some(r) if r == UNRATED => Ok(UNRATED),
        Some(r) if (MIN_RATING..=MAX_RATING).contains(&r) => Ok(r),
        Some(r) => Err(ValidationError::RatingOutOfRange(r)),
    }
}

impl TryFrom<RawPlaceData> for PlaceEntity {
    type Error = ValidationError;

    fn try_from(raw: RawPlaceData) -> Result<Self, Self::Error> {
        PlaceEntity::from_raw(raw)
    }
}

/// Places with identifiers are equal when their identifiers are; otherwise
/// every field is compared.
impl PartialEq for PlaceEntity {
    fn eq(&self, other: &Self) -> bool {
        match (&self.identifier, &other.identifier) {
            (Some(a), Some(b)) => a == b,
            _ => self.fields_eq(other),
        }
    }
}

impl std::fmt::Display for PlaceEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} ({})",
            self.name.as_deref().unwrap_or("Unnamed place"),
            self.coordinate
        )?;
        if let Some(address) = &self.formatted_address {
            writeln!(f, "  address: {address}")?;
        }
        if let Some(phone) = &self.phone_number {
            writeln!(f, "  phone:   {phone}")?;
        }
        if let Some(website) = &self.website {
            writeln!(f, "  website: {website}")?;
        }
        if self.is_rated() {
            writeln!(
                f,
                "  rating:  {:.1} ({} reviews)",
                self.rating, self.user_ratings_total
            )?;
        } else {
            writeln!(f, "  rating:  not yet rated")?;
        }
        if let Some(symbol) = self.price_level.symbol() {
            writeln!(f, "  price:   {symbol}")?;
        }
        if !self.types.is_empty() {
            writeln!(f, "  types:   {}", self.types.join(", "))?;
        }
        if let Some(attributions) = &self.attributions {
            write!(f, "  data:    {attributions}")?;
        }
        Ok(())
    }
}
