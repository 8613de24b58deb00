//! Legacy SM-2 migration
//!
//! Maps cards scheduled with the older interval / ease-factor / repetition
//! scheme onto FSRS memory states, and back again for verification.
//!
//! The mapping is lossy. Ease factor becomes difficulty through a coarse
//! linear remap of [1.3, 2.5] onto [10, 1], and lapses are approximated as
//! `repetitions - 1` because the old scheme never recorded them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};
use crate::fsrs::{round2, LearningState, MemoryState, MAX_DIFFICULTY, MIN_DIFFICULTY, MIN_STABILITY};

/// Lowest ease factor the old scheme allowed; anything below marks a struggling card
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease factor mapped to the easiest difficulty
pub const MAX_EASE_FACTOR: f64 = 2.5;

/// Largest interval drift (days) a round trip may show and still validate
pub const ROUND_TRIP_TOLERANCE_DAYS: f64 = 1.0;

// ============================================================================
// LEGACY CARD
// ============================================================================

/// Scheduling data in the old SM-2 shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCard {
    pub id: String,
    /// Days between reviews
    pub interval: f64,
    pub ease_factor: f64,
    pub repetitions: u32,
    #[serde(default)]
    pub last_review: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_review: Option<DateTime<Utc>>,
}

/// Result of migrating a batch of legacy cards
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    /// Converted states keyed by card id, in input order
    pub converted: Vec<(String, MemoryState)>,
    /// Ids whose round trip failed validation; still present in `converted`
    pub mismatched: Vec<String>,
}

impl MigrationReport {
    pub fn is_clean(&self) -> bool {
        self.mismatched.is_empty()
    }
}

// ============================================================================
// CONVERTER
// ============================================================================

/// Bidirectional converter between SM-2 and FSRS representations
pub struct LegacyConverter;

impl LegacyConverter {
    /// Map ease factor onto difficulty (lower ease means harder)
    pub fn ease_to_difficulty(ease_factor: f64) -> f64 {
        let span = MAX_EASE_FACTOR - MIN_EASE_FACTOR;
        let d = MAX_DIFFICULTY - (ease_factor - MIN_EASE_FACTOR) / span * (MAX_DIFFICULTY - MIN_DIFFICULTY);
        round2(d.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY))
    }

    /// Inverse of [`LegacyConverter::ease_to_difficulty`]
    pub fn difficulty_to_ease(difficulty: f64) -> f64 {
        let span = MAX_EASE_FACTOR - MIN_EASE_FACTOR;
        let d = difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
        round2(MIN_EASE_FACTOR + (MAX_DIFFICULTY - d) / (MAX_DIFFICULTY - MIN_DIFFICULTY) * span)
    }

    /// Convert an SM-2 card into an FSRS memory state
    pub fn legacy_to_memory(legacy: &LegacyCard) -> MemoryState {
        let stability = round2(legacy.interval.max(MIN_STABILITY));
        let difficulty = Self::ease_to_difficulty(legacy.ease_factor);

        let state = match legacy.last_review {
            None => LearningState::New,
            Some(_) if legacy.repetitions == 0 => LearningState::Learning,
            Some(_) if legacy.ease_factor < MIN_EASE_FACTOR => LearningState::Relearning,
            Some(_) => LearningState::Review,
        };

        // An interval too large for chrono leaves next_review unset, which
        // fails the round trip instead of panicking.
        let (last_review, next_review) = match legacy.last_review {
            None => (None, None),
            Some(last) => {
                let next = legacy.next_review.or_else(|| {
                    Duration::try_seconds((legacy.interval.max(0.0) * 86_400.0).round() as i64)
                        .and_then(|offset| last.checked_add_signed(offset))
                });
                (Some(last), next)
            }
        };

        MemoryState {
            state,
            difficulty,
            stability,
            last_review,
            next_review,
            scheduled_days: legacy.interval.round() as i64,
            reps: legacy.repetitions,
            lapses: legacy.repetitions.saturating_sub(1),
        }
    }

    /// Convert an FSRS memory state back into SM-2 shape
    pub fn memory_to_legacy(id: impl Into<String>, memory: &MemoryState) -> LegacyCard {
        let interval = match (memory.last_review, memory.next_review) {
            (Some(last), Some(next)) => (next - last).num_days().max(0) as f64,
            _ => 0.0,
        };

        LegacyCard {
            id: id.into(),
            interval,
            ease_factor: Self::difficulty_to_ease(memory.difficulty),
            repetitions: memory.reps,
            last_review: memory.last_review,
            next_review: memory.next_review,
        }
    }

    /// Round-trip check: repetitions exact, interval within one day
    pub fn validate(original: &LegacyCard, converted: &MemoryState) -> bool {
        let back = Self::memory_to_legacy(original.id.clone(), converted);
        converted.reps == original.repetitions
            && (back.interval - original.interval).abs() <= ROUND_TRIP_TOLERANCE_DAYS
    }

    /// Convert and validate, surfacing a failed round trip as an error
    pub fn convert_checked(legacy: &LegacyCard) -> Result<MemoryState> {
        let memory = Self::legacy_to_memory(legacy);
        if Self::validate(legacy, &memory) {
            Ok(memory)
        } else {
            Err(SchedulerError::ConversionMismatch(format!(
                "card {} (interval {}, ease {}, repetitions {})",
                legacy.id, legacy.interval, legacy.ease_factor, legacy.repetitions
            )))
        }
    }

    /// Convert a batch, recording mismatches instead of stopping
    pub fn migrate(records: &[LegacyCard]) -> MigrationReport {
        let mut report = MigrationReport::default();

        for legacy in records {
            let memory = Self::legacy_to_memory(legacy);
            if !Self::validate(legacy, &memory) {
                tracing::warn!(
                    card_id = %legacy.id,
                    interval = legacy.interval,
                    ease_factor = legacy.ease_factor,
                    "legacy round trip mismatch"
                );
                report.mismatched.push(legacy.id.clone());
            }
            report.converted.push((legacy.id.clone(), memory));
        }

        tracing::info!(
            converted = report.converted.len(),
            mismatched = report.mismatched.len(),
            "legacy migration finished"
        );
        report
    }
}

// ============================================================================
// TESTS
// ============================================================================
