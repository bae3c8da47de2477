//! Descriptive value types carried by a [`PlaceEntity`](super::PlaceEntity).
//!
//! These pass through the place factory unchanged, so they are plain data with
//! public fields.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Relative price level of a place, from free to expensive.
///
/// Serialized as its integer level (`-1` through `4`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum PriceLevel {
    #[default]
    Unknown,
    Free,
    Cheap,
    Medium,
    High,
    Expensive,
}

impl PriceLevel {
    #[must_use]
    pub fn level(self) -> i8 {
        match self {
            PriceLevel::Unknown => -1,
            PriceLevel::Free => 0,
            PriceLevel::Cheap => 1,
            PriceLevel::Medium => 2,
            PriceLevel::High => 3,
            PriceLevel::Expensive => 4,
        }
    }

    /// Dollar-sign rendering, e.g. `"$$$"`. `None` when the level is unknown.
    #[must_use]
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            PriceLevel::Unknown => None,
            PriceLevel::Free => Some("free"),
            PriceLevel::Cheap => Some("$"),
            PriceLevel::Medium => Some("$$"),
            PriceLevel::High => Some("$$$"),
            PriceLevel::Expensive => Some("$$$$"),
        }
    }
}

impl TryFrom<i64> for PriceLevel {
    type Error = ValidationError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        match level {
            -1 => Ok(PriceLevel::Unknown),
            0 => Ok(PriceLevel::Free),
            1 => Ok(PriceLevel::Cheap),
            2 => Ok(PriceLevel::Medium),
            3 => Ok(PriceLevel::High),
            4 => Ok(PriceLevel::Expensive),
            other => Err(ValidationError::UnknownPriceLevel(other)),
        }
    }
}

impl From<PriceLevel> for i64 {
    fn from(level: PriceLevel) -> Self {
        i64::from(level.level())
    }
}

impl std::fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceLevel::Unknown => write!(f, "unknown"),
            PriceLevel::Free => write!(f, "free"),
            PriceLevel::Cheap => write!(f, "cheap"),
            PriceLevel::Medium => write!(f, "medium"),
            PriceLevel::High => write!(f, "high"),
            PriceLevel::Expensive => write!(f, "expensive"),
        }
    }
}

/// Whether a place was open when its data was captured.
///
/// Providers no longer populate this, so places never carry a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenNowStatus {
    Yes,
    No,
    Unknown,
}

/// Data-provider attribution that must be shown next to any displayed place
/// data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributions {
    /// Attribution text as provided, e.g. `"Listing by Example Maps"`.
    pub text: String,
    #[serde(default)]
    pub links: Vec<AttributionLink>,
}

impl std::fmt::Display for Attributions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)?;
        for link in &self.links {
            write!(f, " [{}: {}]", link.label, link.url)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionLink {
    pub label: String,
    pub url: String,
}

/// One structured piece of a place's address, e.g. its locality.
///
/// For extracting structured information only; use the formatted address for
/// display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponent {
    /// Long form, e.g. `"California"`.
    pub name: String,
    /// Abbreviated form, e.g. `"CA"`.
    pub short_name: String,
    /// Component types, e.g. `["administrative_area_level_1", "political"]`.
    #[serde(default)]
    pub types: Vec<String>,
}

/// Open Location Code for a place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlusCode {
    /// Global code, e.g. `"849VCWC8+R9"`.
    pub global_code: String,
    /// Locality-relative code, e.g. `"CWC8+R9 Mountain View, CA"`.
    #[serde(default)]
    pub compound_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub periods: Vec<Period>,
    /// Human-readable hours per day, e.g. `"Monday: 9:00 AM – 5:00 PM"`.
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

impl OpeningHours {
    /// `true` when the place reports a single period with no close event.
    #[must_use]
    pub fn is_always_open(&self) -> bool {
        matches!(self.periods.as_slice(), [only] if only.close.is_none())
    }
}

/// An opening interval. A period without a close event never closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub open: DayTime,
    #[serde(default)]
    pub close: Option<DayTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTime {
    pub day: Weekday,
    pub time: NaiveTime,
}

/// Reference to a photo of a place. The image itself is fetched separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    /// Opaque provider reference used to request the image.
    pub reference: String,
    #[serde(default)]
    pub max_size: Option<PhotoSize>,
    #[serde(default)]
    pub attributions: Option<Attributions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSize {
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_level_accepts_documented_range() {
        for level in -1..=4 {
            let parsed = PriceLevel::try_from(level).unwrap();
            assert_eq!(i64::from(parsed), level);
        }
    }

    #[test]
    fn price_level_rejects_unknown_values() {
        assert_eq!(
            PriceLevel::try_from(5),
            Err(ValidationError::UnknownPriceLevel(5))
        );
        assert_eq!(
            PriceLevel::try_from(-2),
            Err(ValidationError::UnknownPriceLevel(-2))
        );
    }

    #[test]
    fn price_level_serializes_as_integer() {
        let json = serde_json::to_string(&PriceLevel::High).unwrap();
        assert_eq!(json, "3");
    }

    #[test]
    fn attributions_display_includes_links() {
        let attributions = Attributions {
            text: "Listing by Example Maps".to_string(),
            links: vec![AttributionLink {
                label: "Example Maps".to_string(),
                url: "https://maps.example.com".to_string(),
            }],
        };
        assert_eq!(
            attributions.to_string(),
            "Listing by Example Maps [Example Maps: https://maps.example.com]"
        );
    }

    #[test]
    fn opening_hours_single_open_ended_period_is_always_open() {
        let hours = OpeningHours {
            periods: vec![Period {
                open: DayTime {
                    day: Weekday::Sun,
                    time: NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
                },
                close: None,
            }],
            weekday_text: vec![],
        };
        assert!(hours.is_always_open());
        assert!(!OpeningHours::default().is_always_open());
    }

    #[test]
    fn period_deserializes_weekday_and_time() {
        let period: Period = serde_json::from_str(
            r#"{"open": {"day": "Mon", "time": "09:00:00"}, "close": {"day": "Mon", "time": "17:30:00"}}"#,
        )
        .unwrap();
        assert_eq!(period.open.day, Weekday::Mon);
        assert_eq!(
            period.close.map(|c| c.time),
            NaiveTime::from_hms_opt(17, 30, 0)
        );
    }
}
