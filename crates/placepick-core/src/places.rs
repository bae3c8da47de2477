//! YAML places file backing the in-memory data source.
//!
//! ```yaml
//! places:
//!   - identifier: p1
//!     name: Shoreline Cafe
//!     coordinate: { latitude: 37.4, longitude: -122.1 }
//!     rating: 4.5
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::place::RawPlaceData;
use crate::AppConfigError;

#[derive(Debug, Deserialize)]
pub struct PlacesFile {
    pub places: Vec<RawPlaceData>,
}

/// Load the places file and check its identifiers.
///
/// Entries are kept raw: validating place data is the picker's job, so a
/// malformed entry surfaces as a failed pick rather than a load error.
///
/// # Errors
///
/// Returns `AppConfigError` if the file cannot be read, parsed, or has empty
/// or duplicate identifiers.
pub fn load_places(path: &Path) -> Result<PlacesFile, AppConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| AppConfigError::PlacesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let places_file: PlacesFile = serde_yaml::from_str(&content)?;

    validate_places(&places_file)?;

    Ok(places_file)
}

fn validate_places(places_file: &PlacesFile) -> Result<(), AppConfigError> {
    let mut seen = HashSet::new();

    for (index, place) in places_file.places.iter().enumerate() {
        let Some(identifier) = place.identifier.as_deref() else {
            continue;
        };

        if identifier.trim().is_empty() {
            return Err(AppConfigError::Validation(format!(
                "place #{index} has an empty identifier"
            )));
        }

        if !seen.insert(identifier) {
            return Err(AppConfigError::Validation(format!(
                "duplicate place identifier: '{identifier}'"
            )));
        }
    }

    Ok(())
}
