//! Session statistics derived from the review history

use serde::{Deserialize, Serialize};

use super::log::ReviewLog;
use crate::fsrs::round2;

/// Aggregates over the ratings of one session
///
/// All values are zero when nothing has been rated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub cards_rated: usize,
    /// Sum of time spent on each card
    pub total_time_ms: i64,
    pub correct_count: usize,
    /// Correct ratings as a fraction in [0, 1]
    pub accuracy_rate: f64,
    pub average_time_per_card_ms: f64,
    /// Correct ratings as a percentage of cards rated
    pub retention_rate: f64,
}

impl SessionStats {
    pub fn from_history(history: &[ReviewLog]) -> Self {
        if history.is_empty() {
            return Self::default();
        }

        let cards_rated = history.len();
        let total_time_ms: i64 = history.iter().map(|log| log.time_spent_ms).sum();
        let correct_count = history.iter().filter(|log| log.rating.is_correct()).count();
        let accuracy = correct_count as f64 / cards_rated as f64;

        Self {
            cards_rated,
            total_time_ms,
            correct_count,
            accuracy_rate: accuracy,
            average_time_per_card_ms: total_time_ms as f64 / cards_rated as f64,
            retention_rate: round2(accuracy * 100.0),
        }
    }
}
