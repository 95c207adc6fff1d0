//! Per-book reading session state machine

use crate::error::SessionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a book is currently being read.
///
/// The session cycles `Idle -> Reading -> Idle` for the whole lifetime of a
/// book. There is no terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadSession {
    #[default]
    Idle,
    Reading,
}

/// A requested session transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionAction {
    Start,
    Finish,
}

impl ReadSession {
    /// Apply a transition, returning the next state.
    ///
    /// Only `Idle --start--> Reading` and `Reading --finish--> Idle` are legal.
    pub fn transition(self, action: SessionAction) -> Result<ReadSession, SessionError> {
        match (self, action) {
            (ReadSession::Idle, SessionAction::Start) => Ok(ReadSession::Reading),
            (ReadSession::Reading, SessionAction::Finish) => Ok(ReadSession::Idle),
            (state, action) => Err(SessionError { state, action }),
        }
    }

    pub fn is_reading(self) -> bool {
        self == ReadSession::Reading
    }
}

impl fmt::Display for ReadSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadSession::Idle => f.write_str("idle"),
            ReadSession::Reading => f.write_str("reading"),
        }
    }
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionAction::Start => f.write_str("start"),
            SessionAction::Finish => f.write_str("finish"),
        }
    }
}
