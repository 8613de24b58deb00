//! Storage Module
//!
//! The engine never persists anything itself. Hosts plug their own backend in
//! behind [`CardStore`]; [`InMemoryStore`] is the reference adapter used by
//! tests and small tools.

mod memory;

pub use memory::{InMemoryStore, StoreSnapshot};

use crate::card::Card;
use crate::session::ReviewLog;

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No card stored under this id
    #[error("Card not found: {0}")]
    NotFound(String),
    /// Save carried a sync version that is not newer than the stored one
    #[error("Version conflict on card {id}: stored {stored}, incoming {incoming}")]
    VersionConflict { id: String, stored: u64, incoming: u64 },
    /// Snapshot encoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StoreError>;

/// Load/save seam between the engine and a persistent backend
///
/// Implementations detect stale writes through `Card::sync_version`; they never
/// merge diverging copies.
pub trait CardStore {
    fn load(&self, id: &str) -> Result<Card>;

    fn save(&mut self, card: Card) -> Result<()>;

    /// Every stored card, in no particular order
    fn all(&self) -> Result<Vec<Card>>;

    /// Review logs are append-only
    fn append_log(&mut self, log: ReviewLog) -> Result<()>;

    fn logs(&self) -> Result<Vec<ReviewLog>>;
}
