//! Review log entries
//!
//! Append-only: entries are never edited or deleted. A correction is a new entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::card::Card;
use crate::fsrs::{LearningState, Rating, ReviewResult};

/// One rating event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLog {
    pub id: String,
    pub session_id: String,
    pub card_id: String,
    pub rating: Rating,
    /// State the card was in when rated
    pub state: LearningState,
    /// Days until the next review, as scheduled by this rating
    pub interval_days: i64,
    /// Days the card had been scheduled for before this rating
    pub last_interval_days: i64,
    /// Difficulty after the rating
    pub difficulty: f64,
    /// Stability after the rating
    pub stability: f64,
    pub elapsed_days: i64,
    /// Time between presenting the card and the rating
    pub time_spent_ms: i64,
    pub reviewed_at: DateTime<Utc>,
}

impl ReviewLog {
    pub(crate) fn record(
        session_id: &str,
        card: &Card,
        rating: Rating,
        result: &ReviewResult,
        time_spent_ms: i64,
        reviewed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            card_id: card.id.clone(),
            rating,
            state: result.previous.state,
            interval_days: result.interval_days,
            last_interval_days: result.previous.scheduled_days,
            difficulty: result.memory.difficulty,
            stability: result.memory.stability,
            elapsed_days: result.elapsed_days,
            time_spent_ms,
            reviewed_at,
        }
    }
}
