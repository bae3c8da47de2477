//! The selection state machine.
//!
//! Every transition is evaluated under one mutex, so user gestures, host
//! cancellation and data-source completions are applied strictly one at a
//! time. The lock is never held across an `.await` or while calling the
//! observer or the presentation surface.
//!
//! Each data-source request is tagged with a [`FetchTicket`]. Only the result
//! for the most recent search ticket is applied, and only while the session
//! is still presenting; anything else is stale and discarded. A pick holds its
//! own ticket: once a pick is in flight it is committed, and searches started
//! before or after it are discarded.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use placepick_core::{PickerConfiguration, PlaceEntity, RawPlaceData};

use crate::error::{DataSourceError, PickerError, SessionError};
use crate::notifier::{Outcome, SelectionNotifier, SelectionObserver};
use crate::source::{PlaceDataSource, SearchQuery};
use crate::state::{SessionState, Transition};
use crate::surface::PresentationSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FetchTicket(u64);

#[derive(Debug)]
struct Inner {
    state: SessionState,
    configuration: PickerConfiguration,
    candidates: Vec<RawPlaceData>,
    searching: Option<FetchTicket>,
    picking: Option<FetchTicket>,
    next_ticket: u64,
}

impl Inner {
    fn expect_state(
        &self,
        operation: &'static str,
        expected: SessionState,
    ) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    /// `Ok(true)` while presenting; `Ok(false)` once finished, meaning the
    /// input lost a race and must be dropped; an error before presenting.
    fn accepts_input(&self, operation: &'static str) -> Result<bool, SessionError> {
        match self.state {
            SessionState::Presenting => Ok(true),
            state if state.is_terminal() => Ok(false),
            state => Err(SessionError::InvalidState { operation, state }),
        }
    }

    fn next_ticket(&mut self) -> FetchTicket {
        self.next_ticket += 1;
        FetchTicket(self.next_ticket)
    }

    /// `None` while a pick is in flight; searches cannot replace the
    /// candidates a pick was made from.
    fn issue_search(&mut self) -> Option<FetchTicket> {
        if self.picking.is_some() {
            return None;
        }
        let ticket = self.next_ticket();
        self.searching = Some(ticket);
        Some(ticket)
    }

    /// `None` if another pick is already in flight. Any outstanding search
    /// becomes stale.
    fn issue_pick(&mut self) -> Option<FetchTicket> {
        if self.picking.is_some() {
            return None;
        }
        let ticket = self.next_ticket();
        self.searching = None;
        self.picking = Some(ticket);
        Some(ticket)
    }

    fn redeem_search(&mut self, ticket: FetchTicket) -> bool {
        if self.state == SessionState::Presenting
            && self.picking.is_none()
            && self.searching == Some(ticket)
        {
            self.searching = None;
            true
        } else {
            false
        }
    }

    fn redeem_pick(&mut self, ticket: FetchTicket) -> bool {
        if self.state == SessionState::Presenting && self.picking == Some(ticket) {
            self.picking = None;
            true
        } else {
            false
        }
    }

    fn outstanding(&self) -> Option<FetchTicket> {
        self.picking.or(self.searching)
    }
}

/// One picking interaction, from configuration to a single reported outcome.
///
/// Share it between the task driving the presentation surface and the host
/// by wrapping it in an [`Arc`]; every method takes `&self`.
pub struct SelectionSession<S, P> {
    source: S,
    surface: P,
    notifier: SelectionNotifier,
    inner: Mutex<Inner>,
}

impl<S, P> SelectionSession<S, P>
where
    S: PlaceDataSource,
    P: PresentationSurface,
{
    /// Creates an `Idle` session.
    pub fn new(source: S, surface: P) -> Self {
        Self {
            source,
            surface,
            notifier: SelectionNotifier::new(),
            inner: Mutex::new(Inner {
                state: SessionState::Idle,
                configuration: PickerConfiguration::default(),
                candidates: Vec::new(),
                searching: None,
                picking: None,
                next_ticket: 0,
            }),
        }
    }

    /// Creates a session and configures it in one step.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Configuration`] if `configuration` is invalid.
    pub fn with_config(
        source: S,
        surface: P,
        configuration: PickerConfiguration,
    ) -> Result<Self, SessionError> {
        let session = Self::new(source, surface);
        session.configure(configuration)?;
        Ok(session)
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    #[must_use]
    pub fn configuration(&self) -> PickerConfiguration {
        self.lock().configuration.clone()
    }

    /// Candidates most recently rendered; gesture indices refer to these.
    #[must_use]
    pub fn candidates(&self) -> Vec<RawPlaceData> {
        self.lock().candidates.clone()
    }

    #[must_use]
    pub fn notifier(&self) -> &SelectionNotifier {
        &self.notifier
    }

    /// Registers the observer that will receive this session's outcome.
    ///
    /// Register before [`start`](Self::start): an outcome produced with no
    /// live observer is dropped.
    pub fn register_observer<O>(&self, observer: &Arc<O>)
    where
        O: SelectionObserver + 'static,
    {
        self.notifier.register(observer);
    }

    /// `Idle → Configured`.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Configuration`] if the viewport is degenerate; the
    ///   session stays `Idle`.
    /// - [`SessionError::InvalidState`] if the session is not `Idle`.
    pub fn configure(&self, configuration: PickerConfiguration) -> Result<(), SessionError> {
        let mut inner = self.lock();
        inner.expect_state("configure", SessionState::Idle)?;
        configuration.validate()?;
        inner.configuration = configuration;
        inner.state = SessionState::Configured;
        tracing::debug!(
            from = %SessionState::Idle,
            to = %SessionState::Configured,
            "selection session transition"
        );
        Ok(())
    }

    /// `Configured → Presenting`, then asks the surface to present.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] unless the session is
    /// `Configured`. Starting a finished session always fails; retrying means
    /// building a new session.
    pub fn start(&self) -> Result<(), SessionError> {
        let configuration = {
            let mut inner = self.lock();
            inner.expect_state("start", SessionState::Configured)?;
            inner.state = SessionState::Presenting;
            inner.configuration.clone()
        };
        if !self.notifier.has_observer() {
            tracing::warn!("selection session started without an observer");
        }
        tracing::debug!(
            from = %SessionState::Configured,
            to = %SessionState::Presenting,
            "selection session transition"
        );
        self.surface.present(&configuration);
        Ok(())
    }

    /// Searches the data source and renders the results as candidates.
    ///
    /// Without an explicit bias the configured viewport is used. A search
    /// failure ends the session in `Failed`. While a pick is in flight the
    /// search is not issued and [`Transition::Discarded`] is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] before the session is presenting.
    pub async fn load_candidates(&self, mut query: SearchQuery) -> Result<Transition, SessionError> {
        let ticket = {
            let mut inner = self.lock();
            if !inner.accepts_input("load candidates")? {
                return Ok(Transition::Discarded);
            }
            let Some(ticket) = inner.issue_search() else {
                drop(inner);
                tracing::debug!("pick in flight; search not issued");
                return Ok(Transition::Discarded);
            };
            if query.bias.is_none() {
                query.bias = inner.configuration.viewport;
            }
            ticket
        };

        let result = self.source.search(&query).await;

        let mut inner = self.lock();
        if !inner.redeem_search(ticket) {
            drop(inner);
            tracing::debug!(ticket = ticket.0, "discarding stale search result");
            return Ok(Transition::Discarded);
        }
        match result {
            Ok(candidates) => {
                inner.candidates.clone_from(&candidates);
                drop(inner);
                self.surface.render(&candidates);
                Ok(Transition::Unchanged)
            }
            Err(error) => Ok(self.conclude(inner, Outcome::Failed(error.into()))),
        }
    }

    /// The user picked the candidate at `index`.
    ///
    /// Candidates with an identifier are re-fetched through
    /// [`PlaceDataSource::details`]; the result is validated and the session
    /// ends `Picked`, or `Failed` if validation or the fetch fails. A second
    /// pick while one is in flight returns [`Transition::Discarded`].
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidState`] before the session is presenting.
    /// - [`SessionError::CandidateOutOfRange`] if `index` was never rendered.
    pub async fn pick(&self, index: usize) -> Result<Transition, SessionError> {
        let (ticket, candidate) = {
            let mut inner = self.lock();
            if !inner.accepts_input("pick")? {
                return Ok(Transition::Discarded);
            }
            let available = inner.candidates.len();
            let candidate = inner
                .candidates
                .get(index)
                .cloned()
                .ok_or(SessionError::CandidateOutOfRange { index, available })?;
            let Some(ticket) = inner.issue_pick() else {
                drop(inner);
                tracing::debug!(index, "pick already in flight; ignoring");
                return Ok(Transition::Discarded);
            };
            (ticket, candidate)
        };

        let result = match candidate.identifier.clone() {
            Some(identifier) => self.source.details(&identifier).await,
            None => Ok(candidate),
        };

        let mut inner = self.lock();
        if !inner.redeem_pick(ticket) {
            drop(inner);
            tracing::debug!(ticket = ticket.0, "discarding stale place details");
            return Ok(Transition::Discarded);
        }
        Ok(self.conclude(inner, selection_outcome(result)))
    }

    /// The user selected a place whose data is already complete.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] before the session is presenting.
    pub fn select(&self, raw: RawPlaceData) -> Result<Transition, SessionError> {
        let inner = self.lock();
        if !inner.accepts_input("select")? {
            return Ok(Transition::Discarded);
        }
        Ok(self.conclude(inner, selection_outcome(Ok(raw))))
    }

    /// The user closed the picker without choosing.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] before the session is presenting.
    pub fn dismiss(&self) -> Result<Transition, SessionError> {
        let inner = self.lock();
        if !inner.accepts_input("dismiss")? {
            return Ok(Transition::Discarded);
        }
        Ok(self.conclude(inner, Outcome::Cancelled))
    }

    /// An external collaborator failed outside of a session-issued request.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] before the session is presenting.
    pub fn report_error(&self, error: DataSourceError) -> Result<Transition, SessionError> {
        let inner = self.lock();
        if !inner.accepts_input("report an error")? {
            return Ok(Transition::Discarded);
        }
        Ok(self.conclude(inner, Outcome::Failed(error.into())))
    }

    /// The host is tearing the picker down. Ends the session as `Cancelled`
    /// from any non-terminal state; an outstanding fetch becomes stale.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] if the session already finished.
    pub fn cancel(&self) -> Result<Transition, SessionError> {
        let inner = self.lock();
        if inner.state.is_terminal() {
            return Err(SessionError::InvalidState {
                operation: "cancel",
                state: inner.state,
            });
        }
        if let Some(ticket) = inner.outstanding() {
            tracing::debug!(ticket = ticket.0, "cancelling with a fetch outstanding");
        }
        Ok(self.conclude(inner, Outcome::Cancelled))
    }

    /// Enters the outcome's terminal state, then notifies with the lock released.
    fn conclude(&self, mut inner: MutexGuard<'_, Inner>, outcome: Outcome) -> Transition {
        let from = inner.state;
        let to = outcome.state();
        inner.state = to;
        inner.searching = None;
        inner.picking = None;
        drop(inner);

        tracing::info!(%from, %to, "selection session finished");
        let delivery = self.notifier.notify(outcome);
        tracing::debug!(?delivery, "selection outcome dispatched");
        Transition::Entered(to)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn selection_outcome(result: Result<RawPlaceData, DataSourceError>) -> Outcome {
    match result {
        Ok(raw) => match PlaceEntity::from_raw(raw) {
            Ok(place) => Outcome::Picked(place),
            Err(error) => {
                tracing::warn!(error = %error, "selected place failed validation");
                Outcome::Failed(PickerError::Validation(error))
            }
        },
        Err(error) => Outcome::Failed(PickerError::DataSource(error)),
    }
}

impl<S, P> std::fmt::Debug for SelectionSession<S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("SelectionSession")
            .field("state", &inner.state)
            .field("candidates", &inner.candidates.len())
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use placepick_core::{CoordinateBounds, ValidationError};

    use super::*;
    use crate::source::StaticDataSource;
    use crate::surface::HeadlessSurface;

    #[derive(Default)]
    struct Recorder {
        outcomes: Mutex<Vec<Outcome>>,
    }

    impl SelectionObserver for Recorder {
        fn on_outcome(&self, outcome: Outcome) {
            self.outcomes.lock().unwrap().push(outcome);
        }
    }

    impl Recorder {
        fn outcomes(&self) -> Vec<Outcome> {
            self.outcomes.lock().unwrap().clone()
        }
    }

    fn places() -> Vec<RawPlaceData> {
        vec![
            RawPlaceData {
                identifier: Some("p1".to_string()),
                name: Some("Shoreline Cafe".to_string()),
                rating: Some(4.5),
                ..RawPlaceData::at(37.4, -122.1)
            },
            RawPlaceData {
                name: Some("Unlocated kiosk".to_string()),
                ..RawPlaceData::default()
            },
        ]
    }

    fn presenting() -> (
        SelectionSession<StaticDataSource, HeadlessSurface>,
        Arc<Recorder>,
    ) {
        let session = SelectionSession::with_config(
            StaticDataSource::new(places()),
            HeadlessSurface,
            PickerConfiguration::default(),
        )
        .unwrap();
        let recorder = Arc::new(Recorder::default());
        session.register_observer(&recorder);
        session.start().unwrap();
        (session, recorder)
    }

    #[test]
    fn new_session_is_idle() {
        let session = SelectionSession::new(StaticDataSource::default(), HeadlessSurface);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn start_before_configure_is_invalid() {
        let session = SelectionSession::new(StaticDataSource::default(), HeadlessSurface);
        assert_eq!(
            session.start(),
            Err(SessionError::InvalidState {
                operation: "start",
                state: SessionState::Idle
            })
        );
    }

    #[test]
    fn degenerate_viewport_keeps_session_idle() {
        let session = SelectionSession::new(StaticDataSource::default(), HeadlessSurface);
        let viewport = CoordinateBounds::from_edges(10.0, 10.0, 10.0, 10.0).unwrap();
        let err = session
            .configure(PickerConfiguration::new(Some(viewport)))
            .unwrap_err();
        assert!(matches!(err, SessionError::Configuration(_)));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(matches!(
            session.start(),
            Err(SessionError::InvalidState { .. })
        ));
    }

    #[test]
    fn configure_twice_is_invalid() {
        let session = SelectionSession::with_config(
            StaticDataSource::default(),
            HeadlessSurface,
            PickerConfiguration::default(),
        )
        .unwrap();
        assert!(matches!(
            session.configure(PickerConfiguration::default()),
            Err(SessionError::InvalidState {
                operation: "configure",
                state: SessionState::Configured
            })
        ));
    }

    #[test]
    fn start_twice_is_invalid() {
        let (session, _recorder) = presenting();
        assert!(matches!(
            session.start(),
            Err(SessionError::InvalidState {
                state: SessionState::Presenting,
                ..
            })
        ));
    }

    #[test]
    fn gestures_before_presenting_are_invalid() {
        let session = SelectionSession::with_config(
            StaticDataSource::default(),
            HeadlessSurface,
            PickerConfiguration::default(),
        )
        .unwrap();
        assert!(matches!(
            session.dismiss(),
            Err(SessionError::InvalidState {
                operation: "dismiss",
                ..
            })
        ));
        assert!(matches!(
            session.select(RawPlaceData::at(0.0, 0.0)),
            Err(SessionError::InvalidState { .. })
        ));
    }

    #[test]
    fn select_valid_place_is_picked() {
        let (session, recorder) = presenting();
        let transition = session.select(places().remove(0)).unwrap();
        assert_eq!(transition, Transition::Entered(SessionState::Picked));
        let outcomes = recorder.outcomes();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(
            outcomes[0].place().and_then(PlaceEntity::identifier),
            Some("p1")
        );
    }

    #[test]
    fn select_invalid_place_fails_with_validation_error() {
        let (session, recorder) = presenting();
        let transition = session.select(RawPlaceData::default()).unwrap();
        assert_eq!(transition, Transition::Entered(SessionState::Failed));
        assert_eq!(
            recorder.outcomes(),
            [Outcome::Failed(PickerError::Validation(
                ValidationError::MissingCoordinate
            ))]
        );
    }

    #[test]
    fn cancel_from_configured_ends_session() {
        let session = SelectionSession::with_config(
            StaticDataSource::default(),
            HeadlessSurface,
            PickerConfiguration::default(),
        )
        .unwrap();
        let recorder = Arc::new(Recorder::default());
        session.register_observer(&recorder);
        assert_eq!(
            session.cancel().unwrap(),
            Transition::Entered(SessionState::Cancelled)
        );
        assert_eq!(recorder.outcomes(), [Outcome::Cancelled]);
    }

    #[test]
    fn inputs_after_terminal_state_are_discarded() {
        let (session, recorder) = presenting();
        session.dismiss().unwrap();
        assert_eq!(session.dismiss().unwrap(), Transition::Discarded);
        assert_eq!(
            session.select(places().remove(0)).unwrap(),
            Transition::Discarded
        );
        assert_eq!(
            session
                .report_error(DataSourceError::Network("late".to_string()))
                .unwrap(),
            Transition::Discarded
        );
        assert_eq!(recorder.outcomes(), [Outcome::Cancelled]);
    }

    #[tokio::test]
    async fn pick_unlocated_candidate_fails_validation() {
        let (session, recorder) = presenting();
        session.load_candidates(SearchQuery::new(10)).await.unwrap();
        assert_eq!(session.candidates().len(), 2);
        let transition = session.pick(1).await.unwrap();
        assert_eq!(transition, Transition::Entered(SessionState::Failed));
        assert!(matches!(
            recorder.outcomes().as_slice(),
            [Outcome::Failed(PickerError::Validation(_))]
        ));
    }

    #[tokio::test]
    async fn pick_out_of_range_leaves_session_presenting() {
        let (session, recorder) = presenting();
        session.load_candidates(SearchQuery::new(10)).await.unwrap();
        assert_eq!(
            session.pick(7).await,
            Err(SessionError::CandidateOutOfRange {
                index: 7,
                available: 2
            })
        );
        assert_eq!(session.state(), SessionState::Presenting);
        assert!(recorder.outcomes().is_empty());
    }

    #[tokio::test]
    async fn load_candidates_uses_configured_viewport_as_bias() {
        let viewport = CoordinateBounds::from_edges(37.0, -123.0, 38.0, -122.0).unwrap();
        let session = SelectionSession::with_config(
            StaticDataSource::new(places()),
            HeadlessSurface,
            PickerConfiguration::new(Some(viewport)),
        )
        .unwrap();
        session.start().unwrap();
        session.load_candidates(SearchQuery::new(10)).await.unwrap();
        let candidates = session.candidates();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].identifier.as_deref(), Some("p1"));
    }
}
