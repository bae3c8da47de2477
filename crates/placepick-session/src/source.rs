//! The place data source collaborator.
//!
//! A session never talks to a network itself. It asks a [`PlaceDataSource`]
//! for candidates and details and receives raw data or a
//! [`DataSourceError`] back, asynchronously.

use std::future::Future;
use std::sync::Arc;

use placepick_core::{Coordinate, CoordinateBounds, PlacesFile, RawPlaceData};

use crate::error::DataSourceError;

/// Parameters for a candidate search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Free-text filter; `None` lists everything near the bias region.
    pub text: Option<String>,
    /// Region to prefer. Filled from the picker configuration when unset.
    pub bias: Option<CoordinateBounds>,
    pub limit: usize,
}

impl SearchQuery {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            text: None,
            bias: None,
            limit,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_bias(mut self, bias: CoordinateBounds) -> Self {
        self.bias = Some(bias);
        self
    }
}

pub trait PlaceDataSource: Send + Sync {
    /// Lists candidate places for the user to choose from.
    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<RawPlaceData>, DataSourceError>> + Send;

    /// Fetches full details for the place with `identifier`.
    fn details(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<RawPlaceData, DataSourceError>> + Send;
}

impl<T: PlaceDataSource> PlaceDataSource for Arc<T> {
    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<RawPlaceData>, DataSourceError>> + Send {
        (**self).search(query)
    }

    fn details(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<RawPlaceData, DataSourceError>> + Send {
        (**self).details(identifier)
    }
}

/// Data source over a fixed list of places, typically loaded from a places
/// file.
#[derive(Debug, Clone, Default)]
pub struct StaticDataSource {
    places: Vec<RawPlaceData>,
}

impl StaticDataSource {
    #[must_use]
    pub fn new(places: Vec<RawPlaceData>) -> Self {
        Self { places }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl From<PlacesFile> for StaticDataSource {
    fn from(file: PlacesFile) -> Self {
        Self::new(file.places)
    }
}

/// Places without a usable coordinate cannot be inside any bias region.
fn within_bias(place: &RawPlaceData, bias: Option<&CoordinateBounds>) -> bool {
    let Some(bias) = bias else {
        return true;
    };
    place
        .coordinate
        .and_then(|raw| Coordinate::try_from(raw).ok())
        .is_some_and(|c| bias.contains(c))
}

impl PlaceDataSource for StaticDataSource {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawPlaceData>, DataSourceError> {
        let matches: Vec<RawPlaceData> = self
            .places
            .iter()
            .filter(|p| within_bias(p, query.bias.as_ref()))
            .filter(|p| query.text.as_deref().is_none_or(|t| p.matches_text(t)))
            .take(query.limit)
            .cloned()
            .collect();
        tracing::debug!(
            text = ?query.text,
            limit = query.limit,
            found = matches.len(),
            "static data source search"
        );
        Ok(matches)
    }

    async fn details(&self, identifier: &str) -> Result<RawPlaceData, DataSourceError> {
        self.places
            .iter()
            .find(|p| p.identifier.as_deref() == Some(identifier))
            .cloned()
            .ok_or_else(|| DataSourceError::NotFound(identifier.to_string()))
    }
}
