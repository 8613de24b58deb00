//! Session module - interactive study sessions
//!
//! - `manager`: the session state machine and rating dispatch
//! - `log`: append-only review log entries
//! - `stats`: statistics derived purely from the review log

mod log;
mod manager;
mod stats;

pub use log::ReviewLog;
pub use manager::{ReviewOutcome, SessionManager, SessionPhase, StudySession};
pub use stats::SessionStats;
