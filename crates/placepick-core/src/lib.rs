//! Place model and picker configuration shared by the picker session and its
//! hosts.

pub mod app_config;
pub mod config;
pub mod error;
pub mod geo;
pub mod picker_config;
pub mod place;
pub mod places;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{AppConfigError, ConfigurationError, ValidationError};
pub use geo::{Coordinate, CoordinateBounds, RawBounds, RawCoordinate};
pub use picker_config::PickerConfiguration;
pub use place::{PlaceEntity, PriceLevel, RawPlaceData};
pub use places::{load_places, PlacesFile};
