use thiserror::Error;

/// Raised when raw provider data breaks an invariant of the place model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("place data has no coordinate")]
    MissingCoordinate,

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("rating {0} must be 0.0 (unknown) or within [1.0, 5.0]")]
    RatingOutOfRange(f32),

    #[error("user ratings total {0} is negative")]
    NegativeRatingsTotal(i64),

    #[error("unknown price level {0}; expected -1 through 4")]
    UnknownPriceLevel(i64),

    #[error("viewport {corner} corner is invalid: {source}")]
    InvalidViewport {
        corner: &'static str,
        #[source]
        source: Box<ValidationError>,
    },
}

/// Raised when a picker configuration cannot be used to present a session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error(
        "initial viewport has zero area (latitude span {latitude_span}, longitude span {longitude_span})"
    )]
    ZeroAreaViewport {
        latitude_span: f64,
        longitude_span: f64,
    },

    #[error("initial viewport is inverted: south edge {south} lies north of north edge {north}")]
    InvertedViewport { south: f64, north: f64 },
}

/// Errors from loading process configuration and the places file.
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read places file {path}: {source}")]
    PlacesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse places file: {0}")]
    PlacesFileParse(#[from] serde_yaml::Error),

    #[error("places file validation failed: {0}")]
    Validation(String),
}
