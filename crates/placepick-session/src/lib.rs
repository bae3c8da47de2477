//! Place selection sessions.
//!
//! A [`SelectionSession`] drives one picking interaction against a
//! [`PlaceDataSource`] and a [`PresentationSurface`], and reports exactly one
//! [`Outcome`] to its registered [`SelectionObserver`].

pub mod error;
pub mod notifier;
pub mod session;
pub mod source;
pub mod state;
pub mod surface;

pub use error::{DataSourceError, PickerError, SessionError};
pub use notifier::{Delivery, Outcome, OutcomeChannel, SelectionNotifier, SelectionObserver};
pub use session::SelectionSession;
pub use source::{PlaceDataSource, SearchQuery, StaticDataSource};
pub use state::{SessionState, Transition};
pub use surface::{HeadlessSurface, PresentationSurface};
