//! Deck statistics
//!
//! Read-only aggregates over a card collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::fsrs::{round2, LearningState};

/// Stability (days) at which a card counts as mature
pub const MATURE_STABILITY_DAYS: f64 = 21.0;

/// Aggregate view of a deck at one instant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub learning_cards: usize,
    pub relearning_cards: usize,
    pub review_cards: usize,
    /// Review cards with stability of at least three weeks
    pub mature_cards: usize,
    pub total_lapses: u64,
    /// Averages over reviewed (non-new) cards; 0 when there are none
    pub average_difficulty: f64,
    pub average_stability: f64,
    pub average_retrievability: f64,
}

impl DeckStats {
    pub fn compute(cards: &[Card], now: DateTime<Utc>) -> Self {
        let mut stats = DeckStats {
            total_cards: cards.len(),
            ..Default::default()
        };

        let mut difficulty_sum = 0.0;
        let mut stability_sum = 0.0;
        let mut retrievability_sum = 0.0;

        for card in cards {
            let memory = &card.memory;
            stats.total_lapses += u64::from(memory.lapses);
            match memory.state {
                LearningState::New => {
                    stats.new_cards += 1;
                    continue;
                }
                LearningState::Learning => stats.learning_cards += 1,
                LearningState::Relearning => stats.relearning_cards += 1,
                LearningState::Review => {
                    stats.review_cards += 1;
                    if memory.stability >= MATURE_STABILITY_DAYS {
                        stats.mature_cards += 1;
                    }
                }
            }
            difficulty_sum += memory.difficulty;
            stability_sum += memory.stability;
            retrievability_sum += memory.retrievability_at(now);
        }

        let reviewed = cards.len() - stats.new_cards;
        if reviewed > 0 {
            let n = reviewed as f64;
            stats.average_difficulty = round2(difficulty_sum / n);
            stats.average_stability = round2(stability_sum / n);
            stats.average_retrievability = round2(retrievability_sum / n);
        }
        stats
    }
}
