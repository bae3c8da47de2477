use std::sync::Arc;

use placepick_core::{PickerConfiguration, RawPlaceData};

/// Where the picker is drawn: a map view, a list, a terminal.
///
/// The surface only displays what the session hands it and forwards the
/// user's gestures (pick by index, dismiss) back into the session. It never
/// validates or interprets place data.
pub trait PresentationSurface: Send + Sync {
    /// Called once when the session starts presenting.
    fn present(&self, configuration: &PickerConfiguration);

    /// Shows the current candidates. Gesture indices refer to this slice.
    fn render(&self, candidates: &[RawPlaceData]);
}

impl<T: PresentationSurface + ?Sized> PresentationSurface for Arc<T> {
    fn present(&self, configuration: &PickerConfiguration) {
        (**self).present(configuration);
    }

    fn render(&self, candidates: &[RawPlaceData]) {
        (**self).render(candidates);
    }
}

/// A surface with nothing to draw on; it only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessSurface;

impl PresentationSurface for HeadlessSurface {
    fn present(&self, configuration: &PickerConfiguration) {
        tracing::debug!(viewport = ?configuration.viewport, "presenting picker");
    }

    fn render(&self, candidates: &[RawPlaceData]) {
        tracing::debug!(count = candidates.len(), "rendering candidates");
    }
}
