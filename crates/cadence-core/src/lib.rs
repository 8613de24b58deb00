//! # Cadence Core
//!
//! Spaced-repetition engine for vocabulary and grammar cards:
//!
//! - **FSRS-5**: 19-parameter memory model (difficulty, stability, retrievability)
//! - **Card State Machine**: `new -> learning/relearning -> review` with fuzzed intervals
//! - **Legacy Migration**: SM-2 interval/ease cards converted with round-trip checks
//! - **Study Scheduling**: due-card partitioning and priority queues
//! - **Study Sessions**: bounded sessions with an append-only review log
//!
//! Nothing here touches disk or the network. Cards come from, and go back to,
//! a host-provided [`CardStore`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cadence_core::prelude::*;
//!
//! let mut store = InMemoryStore::new();
//! store.save(Card::new(input))?;
//!
//! let scheduler = FSRSScheduler::new(FSRSParameters::default())?;
//! let mut session = SessionManager::new(scheduler, StudyScheduler::new());
//!
//! if session.start_due(&store.all()?, Utc::now())?.is_some() {
//!     let outcome = session.answer(Rating::Good)?;
//!     store.save(outcome.card)?;
//!     store.append_log(outcome.log)?;
//! }
//! let stats = session.get_session_stats();
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod card;
pub mod error;
pub mod fsrs;
pub mod legacy;
pub mod session;
pub mod stats;
pub mod storage;
pub mod study;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use card::{Card, CardContent, CardContext, CardKind, NewCardInput};
pub use error::{Result, SchedulerError};

// FSRS-5
pub use fsrs::{
    FSRSParameters, FSRSScheduler, LearningState, MemoryState, PreviewResults, Rating,
    ReviewResult,
};

pub use legacy::{LegacyCard, LegacyConverter, MigrationReport};
pub use session::{
    ReviewLog, ReviewOutcome, SessionManager, SessionPhase, SessionStats, StudySession,
};
pub use stats::DeckStats;
pub use storage::{CardStore, InMemoryStore, StoreError, StoreSnapshot};
pub use study::{DueSummary, StudyConfig, StudyScheduler};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// FSRS algorithm version (5 = 19 parameters)
pub const FSRS_VERSION: u8 = 5;

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        Card, CardContent, CardStore, DeckStats, FSRSParameters, FSRSScheduler,
        InMemoryStore, LearningState, LegacyConverter, MemoryState, NewCardInput, Rating,
        Result, SchedulerError, SessionManager, StudyScheduler,
    };
    pub use chrono::Utc;
}
