use crate::app_config::{AppConfig, Environment};
use crate::geo::CoordinateBounds;
use crate::AppConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `AppConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, AppConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `AppConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, AppConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can use a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, AppConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, AppConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| AppConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("PLACEPICK_ENV", "development"));
    let log_level = or_default("PLACEPICK_LOG_LEVEL", "info");
    let places_path = PathBuf::from(or_default("PLACEPICK_PLACES_PATH", "./config/places.yaml"));

    let default_viewport = match lookup("PLACEPICK_DEFAULT_VIEWPORT") {
        Ok(raw) => Some(parse_viewport(&raw).map_err(|reason| AppConfigError::InvalidEnvVar {
            var: "PLACEPICK_DEFAULT_VIEWPORT".to_string(),
            reason,
        })?),
        Err(_) => None,
    };

    let search_limit = parse_usize("PLACEPICK_SEARCH_LIMIT", "20")?;
    if search_limit == 0 {
        return Err(AppConfigError::InvalidEnvVar {
            var: "PLACEPICK_SEARCH_LIMIT".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        places_path,
        default_viewport,
        search_limit,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

/// Parse `"south,west,north,east"` into bounds.
///
/// Only coordinate ranges are checked here; whether the box is usable as a
/// picker viewport is decided by `PickerConfiguration::validate`.
pub(crate) fn parse_viewport(raw: &str) -> Result<CoordinateBounds, String> {
    let edges = raw
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("'{}': {e}", part.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let [south, west, north, east] = edges.as_slice() else {
        return Err(format!(
            "expected 4 comma-separated values (south,west,north,east), got {}",
            edges.len()
        ));
    };

    CoordinateBounds::from_edges(*south, *west, *north, *east).map_err(|e| e.to_string())
}
