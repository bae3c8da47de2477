//! Geographic primitives shared by the place model and picker configuration.
//!
//! [`Coordinate`] can only hold in-range values: every way of building one,
//! including deserialization, goes through [`Coordinate::new`].

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate, rejecting latitudes outside `[-90, 90]` and
    /// longitudes outside `[-180, 180]`. `NaN` is out of range for both.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::LatitudeOutOfRange`] or
    /// [`ValidationError::LongitudeOutOfRange`].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// Unvalidated coordinate as supplied by a data provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = ValidationError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        Self {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

/// A rectangular area bounded by its northeast and southwest corners.
///
/// When the west edge lies east of the east edge the box wraps across the
/// antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateBounds {
    pub northeast: Coordinate,
    pub southwest: Coordinate,
}

impl CoordinateBounds {
    #[must_use]
    pub fn new(northeast: Coordinate, southwest: Coordinate) -> Self {
        Self {
            northeast,
            southwest,
        }
    }

    /// Builds bounds from edge values in `south, west, north, east` order.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if any edge is out of coordinate range.
    pub fn from_edges(
        south: f64,
        west: f64,
        north: f64,
        east: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            northeast: Coordinate::new(north, east)?,
            southwest: Coordinate::new(south, west)?,
        })
    }

    #[must_use]
    pub fn north(&self) -> f64 {
        self.northeast.latitude
    }

    #[must_use]
    pub fn south(&self) -> f64 {
        self.southwest.latitude
    }

    #[must_use]
    pub fn east(&self) -> f64 {
        self.northeast.longitude
    }

    #[must_use]
    pub fn west(&self) -> f64 {
        self.southwest.longitude
    }

    #[must_use]
    pub fn crosses_antimeridian(&self) -> bool {
        self.west() > self.east()
    }

    /// Signed north-south extent in degrees; negative when the box is inverted.
    #[must_use]
    pub fn latitude_span(&self) -> f64 {
        self.north() - self.south()
    }

    /// East-west extent in degrees, accounting for antimeridian wrap.
    #[must_use]
    pub fn longitude_span(&self) -> f64 {
        if self.crosses_antimeridian() {
            self.east() + 360.0 - self.west()
        } else {
            self.east() - self.west()
        }
    }

    #[must_use]
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        let lat = coordinate.latitude;
        let lng = coordinate.longitude;
        if lat < self.south() || lat > self.north() {
            return false;
        }
        if self.crosses_antimeridian() {
            lng >= self.west() || lng <= self.east()
        } else {
            lng >= self.west() && lng <= self.east()
        }
    }

    #[must_use]
    pub fn center(&self) -> Coordinate {
        let latitude = self.south() + self.latitude_span() / 2.0;
        let mut longitude = self.west() + self.longitude_span() / 2.0;
        if longitude > 180.0 {
            longitude -= 360.0;
        }
        Coordinate {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for CoordinateBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] to [{}]", self.southwest, self.northeast)
    }
}

/// Unvalidated bounds as supplied by a data provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBounds {
    pub northeast: RawCoordinate,
    pub southwest: RawCoordinate,
}

impl TryFrom<RawBounds> for CoordinateBounds {
    type Error = ValidationError;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        let northeast =
            Coordinate::try_from(raw.northeast).map_err(|e| ValidationError::InvalidViewport {
                corner: "northeast",
                source: Box::new(e),
            })?;
        let southwest =
            Coordinate::try_from(raw.southwest).map_err(|e| ValidationError::InvalidViewport {
                corner: "southwest",
                source: Box::new(e),
            })?;
        Ok(Self {
            northeast,
            southwest,
        })
    }
}

impl From<CoordinateBounds> for RawBounds {
    fn from(b: CoordinateBounds) -> Self {
        Self {
            northeast: b.northeast.into(),
            southwest: b.southwest.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_accepts_poles_and_antimeridian() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn coordinate_rejects_out_of_range_latitude() {
        assert_eq!(
            Coordinate::new(90.5, 0.0),
            Err(ValidationError::LatitudeOutOfRange(90.5))
        );
    }

    #[test]
    fn coordinate_rejects_out_of_range_longitude() {
        assert_eq!(
            Coordinate::new(0.0, -180.01),
            Err(ValidationError::LongitudeOutOfRange(-180.01))
        );
    }

    #[test]
    fn coordinate_rejects_nan() {
        assert!(matches!(
            Coordinate::new(f64::NAN, 0.0),
            Err(ValidationError::LatitudeOutOfRange(_))
        ));
    }

    #[test]
    fn deserializing_out_of_range_coordinate_fails() {
        let result: Result<Coordinate, _> =
            serde_json::from_str(r#"{"latitude": 120.0, "longitude": 0.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn bounds_contains_point_inside() {
        let bounds = CoordinateBounds::from_edges(37.0, -123.0, 38.0, -122.0).unwrap();
        assert!(bounds.contains(Coordinate::new(37.4, -122.1).unwrap()));
        assert!(!bounds.contains(Coordinate::new(36.9, -122.1).unwrap()));
    }

    #[test]
    fn bounds_across_antimeridian() {
        let bounds = CoordinateBounds::from_edges(-20.0, 170.0, -10.0, -170.0).unwrap();
        assert!(bounds.crosses_antimeridian());
        assert!((bounds.longitude_span() - 20.0).abs() < 1e-9);
        assert!(bounds.contains(Coordinate::new(-15.0, 179.0).unwrap()));
        assert!(bounds.contains(Coordinate::new(-15.0, -175.0).unwrap()));
        assert!(!bounds.contains(Coordinate::new(-15.0, 0.0).unwrap()));
        let center = bounds.center();
        assert!((center.longitude().abs() - 180.0).abs() < 1e-9);
        assert!((center.latitude() + 15.0).abs() < 1e-9);
    }

    #[test]
    fn raw_bounds_reports_failing_corner() {
        let raw = RawBounds {
            northeast: RawCoordinate {
                latitude: 10.0,
                longitude: 10.0,
            },
            southwest: RawCoordinate {
                latitude: -95.0,
                longitude: 0.0,
            },
        };
        let err = CoordinateBounds::try_from(raw).unwrap_err();
        assert!(
            matches!(err, ValidationError::InvalidViewport { corner: "southwest", .. }),
            "got {err:?}"
        );
    }
}
