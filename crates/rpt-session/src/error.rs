//! Error types for editing sessions.

use rpt_persistence::PersistenceError;
use rpt_placement::PlacementError;
use thiserror::Error;

use crate::state::SessionState;

/// Why a session command failed.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Another load or save is in flight.
    #[error("Session is busy ({state})")]
    Busy { state: SessionState },

    #[error("No configuration is loaded")]
    NoConfiguration,

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// A blocking store task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(String),
}

impl SessionError {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }

    /// Message suitable for showing to the person editing.
    pub fn user_message(&self) -> String {
        match self {
            Self::Persistence(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
