//! Single-observer outcome delivery.
//!
//! A session reports exactly one [`Outcome`] to at most one
//! [`SelectionObserver`]. The notifier only holds a [`Weak`] reference: keeping
//! the observer alive is the caller's job, and an observer that has been
//! dropped simply stops receiving outcomes.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use placepick_core::PlaceEntity;
use tokio::sync::oneshot;

use crate::error::PickerError;
use crate::state::SessionState;

/// How a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Picked(PlaceEntity),
    Cancelled,
    Failed(PickerError),
}

impl Outcome {
    /// The terminal state this outcome corresponds to.
    #[must_use]
    pub fn state(&self) -> SessionState {
        match self {
            Outcome::Picked(_) => SessionState::Picked,
            Outcome::Cancelled => SessionState::Cancelled,
            Outcome::Failed(_) => SessionState::Failed,
        }
    }

    #[must_use]
    pub fn place(&self) -> Option<&PlaceEntity> {
        match self {
            Outcome::Picked(place) => Some(place),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_place(self) -> Option<PlaceEntity> {
        match self {
            Outcome::Picked(place) => Some(place),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&PickerError> {
        match self {
            Outcome::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Receives the outcome of a selection session.
///
/// Called on whichever thread performed the terminal transition, after the
/// session's internal lock has been released. Dismissing the presentation
/// surface is the observer's responsibility.
pub trait SelectionObserver: Send + Sync {
    fn on_outcome(&self, outcome: Outcome);
}

/// Whether an outcome reached an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// No live observer was registered; the outcome is gone.
    Dropped,
}

#[derive(Default)]
pub struct SelectionNotifier {
    observer: Mutex<Option<Weak<dyn SelectionObserver>>>,
}

impl SelectionNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer`, replacing any previous one.
    pub fn register<O>(&self, observer: &Arc<O>)
    where
        O: SelectionObserver + 'static,
    {
        let weak = Arc::downgrade(observer);
        let weak: Weak<dyn SelectionObserver> = weak;
        *self.slot() = Some(weak);
    }

    pub fn clear(&self) {
        *self.slot() = None;
    }

    /// `true` if an observer is registered and still alive.
    #[must_use]
    pub fn has_observer(&self) -> bool {
        self.slot()
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Hands `outcome` to the observer, if there is one.
    pub fn notify(&self, outcome: Outcome) -> Delivery {
        let observer = self.slot().as_ref().and_then(Weak::upgrade);
        match observer {
            Some(observer) => {
                observer.on_outcome(outcome);
                Delivery::Delivered
            }
            None => {
                tracing::warn!(
                    outcome = %outcome.state(),
                    "no observer registered; selection outcome dropped"
                );
                Delivery::Dropped
            }
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Weak<dyn SelectionObserver>>> {
        self.observer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SelectionNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionNotifier")
            .field("has_observer", &self.has_observer())
            .finish()
    }
}

/// Observer that forwards the outcome into a oneshot channel, for hosts that
/// want to `.await` the end of a session.
///
/// The returned `Arc` must be kept alive until the outcome arrives.
#[derive(Debug)]
pub struct OutcomeChannel {
    sender: Mutex<Option<oneshot::Sender<Outcome>>>,
}

impl OutcomeChannel {
    #[must_use]
    pub fn new() -> (Arc<Self>, oneshot::Receiver<Outcome>) {
        let (tx, rx) = oneshot::channel();
        let channel = Arc::new(Self {
            sender: Mutex::new(Some(tx)),
        });
        (channel, rx)
    }
}

impl SelectionObserver for OutcomeChannel {
    fn on_outcome(&self, outcome: Outcome) {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match sender {
            Some(tx) => {
                if tx.send(outcome).is_err() {
                    tracing::debug!("outcome receiver dropped before delivery");
                }
            }
            None => tracing::warn!("outcome channel already used; ignoring second outcome"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[derive(Default)]
    struct Counter {
        calls: AtomicU32,
    }

    impl SelectionObserver for Counter {
        fn on_outcome(&self, _outcome: Outcome) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn notify_without_observer_drops() {
        let notifier = SelectionNotifier::new();
        assert!(!notifier.has_observer());
        assert_eq!(notifier.notify(Outcome::Cancelled), Delivery::Dropped);
    }

    #[test]
    fn notify_delivers_to_registered_observer() {
        let notifier = SelectionNotifier::new();
        let counter = Arc::new(Counter::default());
        notifier.register(&counter);
        assert_eq!(notifier.notify(Outcome::Cancelled), Delivery::Delivered);
        assert_eq!(counter.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn notifier_does_not_keep_observer_alive() {
        let notifier = SelectionNotifier::new();
        let counter = Arc::new(Counter::default());
        notifier.register(&counter);
        drop(counter);
        assert!(!notifier.has_observer());
        assert_eq!(notifier.notify(Outcome::Cancelled), Delivery::Dropped);
    }

    #[test]
    fn registering_replaces_previous_observer() {
        let notifier = SelectionNotifier::new();
        let first = Arc::new(Counter::default());
        let second = Arc::new(Counter::default());
        notifier.register(&first);
        notifier.register(&second);
        notifier.notify(Outcome::Cancelled);
        assert_eq!(first.calls.load(Ordering::SeqCst), 0);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clear_removes_observer() {
        let notifier = SelectionNotifier::new();
        let counter = Arc::new(Counter::default());
        notifier.register(&counter);
        notifier.clear();
        assert_eq!(notifier.notify(Outcome::Cancelled), Delivery::Dropped);
        assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn outcome_channel_forwards_first_outcome() {
        let (channel, rx) = OutcomeChannel::new();
        channel.on_outcome(Outcome::Cancelled);
        channel.on_outcome(Outcome::Cancelled);
        assert_eq!(rx.await.unwrap(), Outcome::Cancelled);
    }

    #[test]
    fn outcome_accessors() {
        let outcome = Outcome::Failed(PickerError::DataSource(
            crate::error::DataSourceError::Network("offline".to_string()),
        ));
        assert_eq!(outcome.state(), SessionState::Failed);
        assert!(outcome.place().is_none());
        assert!(outcome.error().is_some());
        assert!(outcome.into_place().is_none());
    }
}
