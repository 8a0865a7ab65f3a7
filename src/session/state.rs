//! Session lifecycle state machine.
//!
//! ```text
//! Connecting ──handshake──▶ Open ──disconnect / transport error──▶ Closing ──▶ Closed
//! Connecting ──transport error──────────────────────────────────▶ Closing
//! ```
//!
//! `Closed` is terminal.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Transport accepted, acknowledgment not yet sent.
    #[default]
    Connecting,

    /// Accepting events.
    Open,

    /// Transport gone; cleanup in progress.
    Closing,

    /// Deregistered.  No further transitions.
    Closed,
}

impl SessionState {
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Connecting => "connecting",
            SessionState::Open => "open",
            SessionState::Closing => "closing",
            SessionState::Closed => "closed",
        }
    }

    /// ```
    /// use grammar_assist::session::SessionState;
    ///
    /// assert!(SessionState::Closed.is_terminal());
    /// assert!(!SessionState::Open.is_terminal());
    /// ```
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Closed)
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (SessionState::Connecting, SessionState::Open)
                | (SessionState::Connecting, SessionState::Closing)
                | (SessionState::Open, SessionState::Closing)
                | (SessionState::Closing, SessionState::Closed)
        )
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid session transition {from:?} -> {to:?}")]
    InvalidTransition {
        from: SessionState,
        to: SessionState,
    },
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One real-time connection.  Nothing in it outlives the connection.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    state: SessionState,
    created_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Connecting,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn transition(&mut self, next: SessionState) -> Result<(), SessionError> {
        if !self.state.can_transition_to(next) {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        log::debug!("session {}: {} -> {}", self.id, self.state.label(), next.label());
        self.state = next;
        Ok(())
    }

    /// Drive the session to `Closed` from wherever it is.
    pub fn close(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        // Connecting and Open both have a legal edge to Closing.
        if self.state != SessionState::Closing {
            let _ = self.transition(SessionState::Closing);
        }
        let _ = self.transition(SessionState::Closed);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_connecting() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Connecting);
        assert!(session.created_at() <= Utc::now());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Session::new().id(), Session::new().id());
    }

    #[test]
    fn happy_path_transitions() {
        let mut session = Session::new();
        session.transition(SessionState::Open).unwrap();
        session.transition(SessionState::Closing).unwrap();
        session.transition(SessionState::Closed).unwrap();
        assert!(session.state().is_terminal());
    }

    #[test]
    fn rejects_illegal_transitions() {
        let mut session = Session::new();
        assert_eq!(
            session.transition(SessionState::Closed),
            Err(SessionError::InvalidTransition {
                from: SessionState::Connecting,
                to: SessionState::Closed,
            })
        );

        session.transition(SessionState::Open).unwrap();
        assert!(session.transition(SessionState::Connecting).is_err());
        assert_eq!(session.state(), SessionState::Open);
    }

    #[test]
    fn closed_is_terminal() {
        for next in [
            SessionState::Connecting,
            SessionState::Open,
            SessionState::Closing,
            SessionState::Closed,
        ] {
            assert!(!SessionState::Closed.can_transition_to(next));
        }
    }

    #[test]
    fn close_from_any_state() {
        let mut connecting = Session::new();
        connecting.close();
        assert_eq!(connecting.state(), SessionState::Closed);

        let mut open = Session::new();
        open.transition(SessionState::Open).unwrap();
        open.close();
        assert_eq!(open.state(), SessionState::Closed);

        open.close();
        assert_eq!(open.state(), SessionState::Closed);
    }

    #[test]
    fn labels() {
        assert_eq!(SessionState::Connecting.label(), "connecting");
        assert_eq!(SessionState::Open.label(), "open");
        assert_eq!(SessionState::Closing.label(), "closing");
        assert_eq!(SessionState::Closed.label(), "closed");
    }
}
