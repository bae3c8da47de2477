use std::path::PathBuf;

use crate::geo::CoordinateBounds;
use crate::picker_config::PickerConfiguration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub places_path: PathBuf,
    pub default_viewport: Option<CoordinateBounds>,
    pub search_limit: usize,
}

impl AppConfig {
    /// Picker configuration seeded from `PLACEPICK_DEFAULT_VIEWPORT`.
    #[must_use]
    pub fn picker_configuration(&self) -> PickerConfiguration {
        PickerConfiguration::new(self.default_viewport)
    }
}
