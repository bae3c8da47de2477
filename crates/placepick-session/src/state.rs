/// Lifecycle of a selection session.
///
/// `Idle → Configured → Presenting → {Picked, Cancelled, Failed}`. The last
/// three are terminal: once entered, nothing moves the session again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    Configured,
    Presenting,
    Picked,
    Cancelled,
    Failed,
}

impl SessionState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Picked | SessionState::Cancelled | SessionState::Failed
        )
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Configured => write!(f, "configured"),
            SessionState::Presenting => write!(f, "presenting"),
            SessionState::Picked => write!(f, "picked"),
            SessionState::Cancelled => write!(f, "cancelled"),
            SessionState::Failed => write!(f, "failed"),
        }
    }
}

/// What an input did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The session moved into this state.
    Entered(SessionState),
    /// The input was applied without changing state (e.g. candidates loaded).
    Unchanged,
    /// The input lost a race: the session had already finished, or a newer
    /// request superseded it. Nothing was applied and nothing was notified.
    Discarded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_outcome_states_are_terminal() {
        assert!(!SessionState::Idle.is_terminal());
        assert!(!SessionState::Configured.is_terminal());
        assert!(!SessionState::Presenting.is_terminal());
        assert!(SessionState::Picked.is_terminal());
        assert!(SessionState::Cancelled.is_terminal());
        assert!(SessionState::Failed.is_terminal());
    }
}
