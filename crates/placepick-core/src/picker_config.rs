use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::geo::CoordinateBounds;

/// Initial state for a picking session.
///
/// The viewport is both the map region first shown and the bias applied to
/// candidate searches. Without one, the presentation surface centers on the
/// user's own location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PickerConfiguration {
    #[serde(default)]
    pub viewport: Option<CoordinateBounds>,
}

impl PickerConfiguration {
    #[must_use]
    pub fn new(viewport: Option<CoordinateBounds>) -> Self {
        Self { viewport }
    }

    /// Checks that the configuration can be presented.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::InvertedViewport`] if the south edge lies north
    ///   of the north edge.
    /// - [`ConfigurationError::ZeroAreaViewport`] if the viewport has no
    ///   north-south or east-west extent.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let Some(viewport) = &self.viewport else {
            return Ok(());
        };

        let latitude_span = viewport.latitude_span();
        let longitude_span = viewport.longitude_span();

        if latitude_span < 0.0 {
            return Err(ConfigurationError::InvertedViewport {
                south: viewport.south(),
                north: viewport.north(),
            });
        }

        if latitude_span == 0.0 || longitude_span == 0.0 {
            return Err(ConfigurationError::ZeroAreaViewport {
                latitude_span,
                longitude_span,
            });
        }

        Ok(())
    }
}
