//! Error types for the sync crate.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// `start` was called outside a tokio runtime.
    #[error("No tokio runtime available to run the change pump")]
    NoRuntime,

    /// `start` was called twice.
    #[error("Change pump is already running")]
    AlreadyStarted,
}
