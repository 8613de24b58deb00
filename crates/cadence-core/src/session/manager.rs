//! Session Manager
//!
//! Runs one bounded study session at a time: `idle -> active -> ended`.
//! Owned by the caller; there is no global session.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::log::ReviewLog;
use super::stats::SessionStats;
use crate::card::Card;
use crate::error::{Result, SchedulerError};
use crate::fsrs::{FSRSScheduler, Rating};
use crate::study::StudyScheduler;

// ============================================================================
// SESSION TYPES
// ============================================================================

/// Lifecycle phase of the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    #[default]
    Idle,
    Active,
    Ended,
}

/// Snapshot of a study session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_cards: usize,
    pub new_count: usize,
    pub review_count: usize,
    /// Ratings other than Again
    pub correct_count: usize,
    pub rated_count: usize,
    /// Id of the card awaiting a rating
    pub current_card: Option<String>,
}

impl StudySession {
    pub fn new(
        start_time: DateTime<Utc>,
        total_cards: usize,
        new_count: usize,
        review_count: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            start_time,
            end_time: None,
            total_cards,
            new_count,
            review_count,
            correct_count: 0,
            rated_count: 0,
            current_card: None,
        }
    }
}

/// Result of rating the current card
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    /// Updated card for the caller to persist
    pub card: Card,
    /// Entry appended to the review history
    pub log: ReviewLog,
}

// ============================================================================
// SESSION MANAGER
// ============================================================================

/// Drives a study session: presents cards, applies ratings, keeps the log
#[derive(Debug, Default)]
pub struct SessionManager {
    scheduler: FSRSScheduler,
    study: StudyScheduler,
    phase: SessionPhase,
    session: Option<StudySession>,
    queue: VecDeque<Card>,
    current: Option<Card>,
    presented_at: Option<DateTime<Utc>>,
    review_history: Vec<ReviewLog>,
}

impl SessionManager {
    pub fn new(scheduler: FSRSScheduler, study: StudyScheduler) -> Self {
        Self {
            scheduler,
            study,
            ..Default::default()
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&StudySession> {
        self.session.as_ref()
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.current.as_ref()
    }

    /// Cards still waiting behind the current one
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Ratings applied since the last `start`, kept after `end`
    pub fn review_history(&self) -> &[ReviewLog] {
        &self.review_history
    }

    pub fn scheduler(&self) -> &FSRSScheduler {
        &self.scheduler
    }

    /// Start a session over `cards`, in the given order
    pub fn start(&mut self, cards: Vec<Card>) -> Result<&StudySession> {
        self.start_at(cards, Utc::now())
    }

    pub fn start_at(&mut self, cards: Vec<Card>, now: DateTime<Utc>) -> Result<&StudySession> {
        if cards.is_empty() {
            return Err(SchedulerError::EmptyQueue);
        }

        let new_count = cards.iter().filter(|c| c.is_new()).count();
        let mut session = StudySession::new(now, cards.len(), new_count, cards.len() - new_count);

        self.queue = cards.into();
        self.current = self.queue.pop_front();
        self.presented_at = Some(now);
        self.review_history.clear();
        session.current_card = self.current.as_ref().map(|c| c.id.clone());

        tracing::info!(
            session_id = %session.id,
            total = session.total_cards,
            new = session.new_count,
            review = session.review_count,
            "study session started"
        );

        self.phase = SessionPhase::Active;
        Ok(&*self.session.insert(session))
    }

    /// Build today's queue from the pool and start on it
    ///
    /// Nothing due is a valid outcome and returns `Ok(None)`.
    pub fn start_due(&mut self, pool: &[Card], now: DateTime<Utc>) -> Result<Option<&StudySession>> {
        let queue = self.study.build_queue(pool, now);
        if queue.is_empty() {
            tracing::debug!(pool = pool.len(), "nothing due");
            return Ok(None);
        }
        self.start_at(queue, now).map(Some)
    }

    /// Rate the current card
    pub fn answer(&mut self, rating: Rating) -> Result<ReviewOutcome> {
        self.answer_at(rating, Utc::now())
    }

    pub fn answer_at(&mut self, rating: Rating, now: DateTime<Utc>) -> Result<ReviewOutcome> {
        if self.phase != SessionPhase::Active {
            return Err(SchedulerError::NoActiveSession);
        }
        let card = self.current.as_ref().ok_or(SchedulerError::NoCurrentCard)?;
        let session = self.session.as_mut().ok_or(SchedulerError::NoActiveSession)?;

        let time_spent_ms = self
            .presented_at
            .map(|t| (now - t).num_milliseconds().max(0))
            .unwrap_or(0);

        let (updated, result) = self.scheduler.review_card(card, rating, now)?;
        let log = ReviewLog::record(&session.id, &updated, rating, &result, time_spent_ms, now);

        session.rated_count += 1;
        if rating.is_correct() {
            session.correct_count += 1;
        }
        self.review_history.push(log.clone());

        self.current = self.queue.pop_front();
        self.presented_at = self.current.as_ref().map(|_| now);
        session.current_card = self.current.as_ref().map(|c| c.id.clone());

        Ok(ReviewOutcome { card: updated, log })
    }

    /// Close the session; the review history stays until the next `start`
    pub fn end(&mut self) -> Result<StudySession> {
        self.end_at(Utc::now())
    }

    pub fn end_at(&mut self, now: DateTime<Utc>) -> Result<StudySession> {
        if self.phase != SessionPhase::Active {
            return Err(SchedulerError::NoActiveSession);
        }
        let session = self.session.as_mut().ok_or(SchedulerError::NoActiveSession)?;

        session.end_time = Some(now);
        session.current_card = None;
        self.current = None;
        self.presented_at = None;
        self.queue.clear();
        self.phase = SessionPhase::Ended;

        tracing::info!(
            session_id = %session.id,
            rated = session.rated_count,
            correct = session.correct_count,
            "study session ended"
        );
        Ok(session.clone())
    }

    pub fn get_session_stats(&self) -> SessionStats {
        SessionStats::from_history(&self.review_history)
    }

    /// Whether the active session has outlived the configured timeout
    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        match (&self.session, self.phase) {
            (Some(session), SessionPhase::Active) => self.study.is_session_stale(session, now),
            _ => false,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
