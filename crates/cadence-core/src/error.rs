//! Error types
//!
//! Every failure in the engine is an explicit variant. Nothing is logged and
//! swallowed: callers decide whether to skip, retry or surface the error.

use crate::storage::StoreError;

/// Engine error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// Card memory is malformed or carries an unknown learning state
    #[error("Invalid card state: {0}")]
    InvalidCardState(String),
    /// `answer()` called without an active session
    #[error("No active study session")]
    NoActiveSession,
    /// `answer()` called after the queue was exhausted
    #[error("No card is awaiting a rating")]
    NoCurrentCard,
    /// `start()` called with zero cards
    #[error("Cannot start a session with an empty queue")]
    EmptyQueue,
    /// Legacy round trip did not reproduce the original card
    #[error("Legacy conversion mismatch: {0}")]
    ConversionMismatch(String),
    /// Scheduler parameters out of range
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    /// Error from the external card store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Engine result type
pub type Result<T> = std::result::Result<T, SchedulerError>;
