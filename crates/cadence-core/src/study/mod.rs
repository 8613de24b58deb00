//! Study queue selection
//!
//! Picks the cards to study today and orders them:
//!
//! 1. **Learning / relearning**: short-term items decay fastest
//! 2. **Review**: least stable first, they are closest to being forgotten
//! 3. **New**: oldest first
//!
//! Due-ness is judged on UTC calendar days, so a card due at 23:00 is
//! studied with the rest of the day's queue. Nothing here mutates a card.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::fsrs::LearningState;
use crate::session::StudySession;

/// Default ceiling on a session's wall-clock age
pub const DEFAULT_SESSION_TIMEOUT_MINUTES: i64 = 30;

// ============================================================================
// CONFIG
// ============================================================================

/// Queue building configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyConfig {
    /// A session older than this is stale
    pub session_timeout_minutes: i64,
    /// Daily cap on new cards (None = unlimited)
    pub new_card_limit: Option<usize>,
    /// Daily cap on review cards (None = unlimited). Learning cards are never capped.
    pub review_limit: Option<usize>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            session_timeout_minutes: DEFAULT_SESSION_TIMEOUT_MINUTES,
            new_card_limit: None,
            review_limit: None,
        }
    }
}

// ============================================================================
// SUMMARIES
// ============================================================================

/// Counts of studyable cards, for UI badges and quotas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueSummary {
    pub new: usize,
    /// Learning and relearning together
    pub learning: usize,
    pub review: usize,
}

impl DueSummary {
    pub fn total(&self) -> usize {
        self.new + self.learning + self.review
    }
}

/// Cards bucketed and ordered for study
#[derive(Debug, Default)]
pub struct DuePartition<'a> {
    pub learning: Vec<&'a Card>,
    pub review: Vec<&'a Card>,
    pub new: Vec<&'a Card>,
}

impl<'a> DuePartition<'a> {
    pub fn summary(&self) -> DueSummary {
        DueSummary {
            new: self.new.len(),
            learning: self.learning.len(),
            review: self.review.len(),
        }
    }
}

// ============================================================================
// STUDY SCHEDULER
// ============================================================================

/// Builds daily study queues from a card pool
#[derive(Debug, Clone, Default)]
pub struct StudyScheduler {
    config: StudyConfig,
}

impl StudyScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StudyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StudyConfig {
        &self.config
    }

    /// Whether a reviewed card is due on `now`'s calendar day
    pub fn is_due(card: &Card, now: DateTime<Utc>) -> bool {
        if card.is_new() {
            return false;
        }
        card.memory
            .next_review
            .map(|t| t.date_naive() <= now.date_naive())
            .unwrap_or(true)
    }

    /// Bucket and order the pool; not-yet-due cards are left out
    pub fn partition<'a>(&self, cards: &'a [Card], now: DateTime<Utc>) -> DuePartition<'a> {
        let mut partition = DuePartition::default();

        for card in cards {
            match card.memory.state {
                LearningState::New => partition.new.push(card),
                _ if !Self::is_due(card, now) => {}
                LearningState::Learning | LearningState::Relearning => partition.learning.push(card),
                LearningState::Review => partition.review.push(card),
            }
        }

        partition
            .learning
            .sort_by(|a, b| a.memory.next_review.cmp(&b.memory.next_review));
        partition.review.sort_by(|a, b| {
            match a.memory.stability.total_cmp(&b.memory.stability) {
                Ordering::Equal => a.memory.next_review.cmp(&b.memory.next_review),
                other => other,
            }
        });
        partition.new.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        partition
    }

    /// Ordered queue for one session, with daily caps applied
    pub fn build_queue(&self, cards: &[Card], now: DateTime<Utc>) -> Vec<Card> {
        let partition = self.partition(cards, now);
        let review_cap = self.config.review_limit.unwrap_or(usize::MAX);
        let new_cap = self.config.new_card_limit.unwrap_or(usize::MAX);

        let queue: Vec<Card> = partition
            .learning
            .into_iter()
            .chain(partition.review.into_iter().take(review_cap))
            .chain(partition.new.into_iter().take(new_cap))
            .cloned()
            .collect();

        tracing::debug!(queue_len = queue.len(), pool = cards.len(), "built study queue");
        queue
    }

    /// Uncapped counts of what is studyable today
    pub fn due_counts(&self, cards: &[Card], now: DateTime<Utc>) -> DueSummary {
        self.partition(cards, now).summary()
    }

    /// Reviewed cards falling due on each of the next `days` days
    ///
    /// Index 0 counts everything due today or overdue.
    pub fn forecast(&self, cards: &[Card], now: DateTime<Utc>, days: usize) -> Vec<usize> {
        let mut buckets = vec![0; days];
        if days == 0 {
            return buckets;
        }
        let today = now.date_naive();

        for card in cards.iter().filter(|c| !c.is_new()) {
            let offset = card
                .memory
                .next_review
                .map(|t| (t.date_naive() - today).num_days().max(0))
                .unwrap_or(0) as usize;
            if let Some(bucket) = buckets.get_mut(offset) {
                *bucket += 1;
            }
        }
        buckets
    }

    /// Whether a session has outlived the timeout. The caller decides what to do.
    pub fn is_session_stale(&self, session: &StudySession, now: DateTime<Utc>) -> bool {
        now - session.start_time > Duration::minutes(self.config.session_timeout_minutes)
    }
}

// ============================================================================
// TESTS
// ============================================================================
