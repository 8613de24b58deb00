//! FSRS Scheduler
//!
//! The card state machine: `new -> learning/relearning -> review`. Every
//! transition returns a fresh [`MemoryState`]; the input is never mutated.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::algorithm::{
    forgetting_curve, fuzz_interval, initial_difficulty, initial_stability, next_difficulty,
    next_forget_stability, next_interval, next_recall_stability, next_short_term_stability,
    DEFAULT_MAXIMUM_INTERVAL, DEFAULT_RETENTION, FSRS5_WEIGHTS, MAX_DIFFICULTY, MIN_DIFFICULTY,
};
use crate::card::Card;
use crate::error::{Result, SchedulerError};

/// Delay before a failed card is shown again
pub const SHORT_TERM_DELAY_MINUTES: i64 = 10;

// ============================================================================
// RATING
// ============================================================================

/// Learner's self-assessment of one review
///
/// The scale skips Hard on purpose. The numeric gaps feed the weight table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rating {
    /// Forgot
    Again = 1,
    /// Recalled
    Good = 3,
    /// Recalled effortlessly
    Easy = 4,
}

impl Rating {
    /// Numeric grade fed into the formulas
    pub fn grade(self) -> f64 {
        self as u8 as f64
    }

    /// Parse from the numeric scale
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Rating::Again),
            3 => Some(Rating::Good),
            4 => Some(Rating::Easy),
            _ => None,
        }
    }

    /// Any rating other than Again counts as a successful recall
    pub fn is_correct(self) -> bool {
        self != Rating::Again
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Again => "again",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Rating::from_u8(value).ok_or_else(|| format!("Unknown rating: {}", value))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> u8 {
        rating as u8
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// LEARNING STATE
// ============================================================================

/// Position of a card in the learning cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LearningState {
    /// Never reviewed
    #[default]
    New,
    /// Failed its first review, being drilled short-term
    Learning,
    /// Lapsed from review, being drilled short-term
    Relearning,
    /// Scheduled in days
    Review,
}

impl LearningState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningState::New => "new",
            LearningState::Learning => "learning",
            LearningState::Relearning => "relearning",
            LearningState::Review => "review",
        }
    }

    /// Learning and relearning run on minute-scale steps
    pub fn is_short_term(&self) -> bool {
        matches!(self, LearningState::Learning | LearningState::Relearning)
    }
}

impl std::str::FromStr for LearningState {
    type Err = SchedulerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(LearningState::New),
            "learning" => Ok(LearningState::Learning),
            "relearning" => Ok(LearningState::Relearning),
            "review" => Ok(LearningState::Review),
            _ => Err(SchedulerError::InvalidCardState(format!(
                "unknown learning state '{}'",
                s
            ))),
        }
    }
}

impl std::fmt::Display for LearningState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// MEMORY STATE
// ============================================================================

/// FSRS state owned by a single card
///
/// Retrievability is not stored. Use [`MemoryState::retrievability_at`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MemoryState {
    pub state: LearningState,
    /// 1.0 (easy) to 10.0 (hard)
    pub difficulty: f64,
    /// Days until recall probability falls to 90%
    pub stability: f64,
    /// `None` only while new
    pub last_review: Option<DateTime<Utc>>,
    /// `None` only while new
    pub next_review: Option<DateTime<Utc>>,
    /// Days between last and next review as scheduled (0 for short-term steps)
    #[serde(default)]
    pub scheduled_days: i64,
    /// Total ratings applied
    pub reps: u32,
    /// Again ratings received while in review
    pub lapses: u32,
}

impl MemoryState {
    /// State of a card that has never been reviewed
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_new(&self) -> bool {
        self.state == LearningState::New
    }

    /// Probability of recall at `now`
    ///
    /// New cards have no memory trace and report 0.
    pub fn retrievability_at(&self, now: DateTime<Utc>) -> f64 {
        match (self.state, self.last_review) {
            (LearningState::New, _) | (_, None) => 0.0,
            (_, Some(last)) => {
                let elapsed = FSRSScheduler::days_since_review(last, now) as f64;
                forgetting_curve(elapsed, self.stability)
            }
        }
    }

    /// Check the invariants a non-new state must hold
    pub fn validate(&self) -> Result<()> {
        if self.is_new() {
            return Ok(());
        }
        if self.last_review.is_none() {
            return Err(SchedulerError::InvalidCardState(format!(
                "{} card has no last review",
                self.state
            )));
        }
        if !self.difficulty.is_finite()
            || !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty)
        {
            return Err(SchedulerError::InvalidCardState(format!(
                "difficulty {} outside [{}, {}]",
                self.difficulty, MIN_DIFFICULTY, MAX_DIFFICULTY
            )));
        }
        if !self.stability.is_finite() || self.stability <= 0.0 {
            return Err(SchedulerError::InvalidCardState(format!(
                "stability {} is not positive",
                self.stability
            )));
        }
        Ok(())
    }
}

// ============================================================================
// PARAMETERS
// ============================================================================

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FSRSParameters {
    pub weights: [f64; 19],
    /// Target probability of recall, in (0, 1)
    pub request_retention: f64,
    /// Cap on scheduled days
    pub maximum_interval: i64,
    pub enable_fuzz: bool,
    /// Minute steps for learning cards. Informational: exposed to callers, not
    /// consumed by the state machine.
    pub learning_steps: Vec<u32>,
    /// Minute steps for relearning cards. Informational, as above.
    pub relearning_steps: Vec<u32>,
}

impl Default for FSRSParameters {
    fn default() -> Self {
        Self {
            weights: FSRS5_WEIGHTS,
            request_retention: DEFAULT_RETENTION,
            maximum_interval: DEFAULT_MAXIMUM_INTERVAL,
            enable_fuzz: true,
            learning_steps: vec![1, 10],
            relearning_steps: vec![10],
        }
    }
}

impl FSRSParameters {
    /// Parse from JSON, filling omitted fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)
            .map_err(|e| SchedulerError::InvalidParameters(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.request_retention > 0.0 && self.request_retention < 1.0) {
            return Err(SchedulerError::InvalidParameters(format!(
                "requestRetention {} must be in (0, 1)",
                self.request_retention
            )));
        }
        if !(1..=DEFAULT_MAXIMUM_INTERVAL).contains(&self.maximum_interval) {
            return Err(SchedulerError::InvalidParameters(format!(
                "maximumInterval {} must be between 1 and {} days",
                self.maximum_interval, DEFAULT_MAXIMUM_INTERVAL
            )));
        }
        if let Some(i) = self.weights.iter().position(|w| !w.is_finite()) {
            return Err(SchedulerError::InvalidParameters(format!(
                "weight w{} is not finite",
                i
            )));
        }
        Ok(())
    }
}

// ============================================================================
// RESULTS
// ============================================================================

/// Outcome of one rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResult {
    /// State after the rating
    pub memory: MemoryState,
    /// State before the rating
    pub previous: MemoryState,
    /// Days until the next review (0 for short-term steps)
    pub interval_days: i64,
    /// Whole days since the previous review
    pub elapsed_days: i64,
    /// Recall probability at the moment of rating
    pub retrievability: f64,
}

/// What each rating would produce, without committing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewResults {
    pub again: ReviewResult,
    pub good: ReviewResult,
    pub easy: ReviewResult,
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// FSRS state machine with an owned, seedable fuzz source
#[derive(Debug, Clone)]
pub struct FSRSScheduler {
    params: FSRSParameters,
    rng: StdRng,
}

impl Default for FSRSScheduler {
    fn default() -> Self {
        Self {
            params: FSRSParameters::default(),
            rng: StdRng::from_os_rng(),
        }
    }
}

impl FSRSScheduler {
    /// Create a scheduler seeded once from the OS
    pub fn new(params: FSRSParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            rng: StdRng::from_os_rng(),
        })
    }

    /// Create a scheduler whose fuzz is reproducible
    pub fn with_seed(params: FSRSParameters, seed: u64) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn params(&self) -> &FSRSParameters {
        &self.params
    }

    /// Whole calendar days (UTC midnight-normalized) between two instants
    pub fn days_since_review(last_review: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        (now.date_naive() - last_review.date_naive())
            .num_days()
            .max(0)
    }

    /// Apply a rating, drawing fuzz from the owned random source
    pub fn review(
        &mut self,
        memory: &MemoryState,
        rating: Rating,
        now: DateTime<Utc>,
    ) -> Result<ReviewResult> {
        let sample = self.params.enable_fuzz.then(|| self.rng.random::<f64>());
        let result = self.transition(memory, rating, now, sample)?;

        tracing::debug!(
            from = %memory.state,
            to = %result.memory.state,
            rating = %rating,
            difficulty = result.memory.difficulty,
            stability = result.memory.stability,
            interval_days = result.interval_days,
            "memory transition"
        );

        Ok(result)
    }

    /// Apply a rating to a card, producing the next card snapshot
    ///
    /// The returned card carries the pre-transition memory as its recovery
    /// snapshot and a bumped sync version.
    pub fn review_card(
        &mut self,
        card: &Card,
        rating: Rating,
        now: DateTime<Utc>,
    ) -> Result<(Card, ReviewResult)> {
        let result = self.review(&card.memory, rating, now).map_err(|e| match e {
            SchedulerError::InvalidCardState(msg) => {
                SchedulerError::InvalidCardState(format!("card {}: {}", card.id, msg))
            }
            other => other,
        })?;
        let updated = card.with_memory(result.memory.clone(), now);
        Ok((updated, result))
    }

    /// Preview every rating without fuzz and without touching the random source
    pub fn preview_reviews(&self, memory: &MemoryState, now: DateTime<Utc>) -> Result<PreviewResults> {
        Ok(PreviewResults {
            again: self.transition(memory, Rating::Again, now, None)?,
            good: self.transition(memory, Rating::Good, now, None)?,
            easy: self.transition(memory, Rating::Easy, now, None)?,
        })
    }

    /// Days until next review: fuzzed, rounded and clamped to `[1, maximum_interval]`
    pub fn next_interval_days(&self, stability: f64, sample: Option<f64>) -> i64 {
        let raw = next_interval(stability, self.params.request_retention);
        let fuzzed = match sample {
            Some(sample) => fuzz_interval(raw, sample),
            None => raw,
        };
        (fuzzed.round() as i64).clamp(1, self.params.maximum_interval)
    }

    fn transition(
        &self,
        memory: &MemoryState,
        rating: Rating,
        now: DateTime<Utc>,
        sample: Option<f64>,
    ) -> Result<ReviewResult> {
        memory.validate()?;

        let w = &self.params.weights;
        let g = rating.grade();

        let (elapsed_days, retrievability) = match memory.last_review {
            Some(last) if !memory.is_new() => {
                let elapsed = Self::days_since_review(last, now);
                (elapsed, forgetting_curve(elapsed as f64, memory.stability))
            }
            _ => (0, 0.0),
        };

        let (state, difficulty, stability, lapses) = match memory.state {
            LearningState::New => {
                let state = if rating == Rating::Again {
                    LearningState::Learning
                } else {
                    LearningState::Review
                };
                (
                    state,
                    initial_difficulty(w, g),
                    initial_stability(w, g),
                    memory.lapses,
                )
            }
            LearningState::Learning | LearningState::Relearning => {
                let state = if rating == Rating::Again {
                    memory.state
                } else {
                    LearningState::Review
                };
                (
                    state,
                    next_difficulty(w, memory.difficulty, g),
                    next_short_term_stability(w, memory.stability, g),
                    memory.lapses,
                )
            }
            LearningState::Review => {
                let difficulty = next_difficulty(w, memory.difficulty, g);
                if rating == Rating::Again {
                    (
                        LearningState::Relearning,
                        difficulty,
                        next_forget_stability(w, memory.difficulty, memory.stability, retrievability),
                        memory.lapses + 1,
                    )
                } else {
                    (
                        LearningState::Review,
                        difficulty,
                        next_recall_stability(
                            w,
                            memory.difficulty,
                            memory.stability,
                            retrievability,
                            g,
                        ),
                        memory.lapses,
                    )
                }
            }
        };

        let (interval_days, offset) = if state.is_short_term() {
            (0, Duration::try_minutes(SHORT_TERM_DELAY_MINUTES))
        } else {
            let days = self.next_interval_days(stability, sample);
            (days, Duration::try_days(days))
        };
        let next_review = offset
            .and_then(|offset| now.checked_add_signed(offset))
            .ok_or_else(|| {
                SchedulerError::InvalidCardState(format!(
                    "next review {} days after {} is out of range",
                    interval_days, now
                ))
            })?;

        Ok(ReviewResult {
            memory: MemoryState {
                state,
                difficulty,
                stability,
                last_review: Some(now),
                next_review: Some(next_review),
                scheduled_days: interval_days,
                reps: memory.reps + 1,
                lapses,
            },
            previous: memory.clone(),
            interval_days,
            elapsed_days,
            retrievability,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
