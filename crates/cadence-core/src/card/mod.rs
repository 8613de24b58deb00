//! Card module - learnable units and their content
//!
//! A card pairs display content (vocabulary or grammar) with the FSRS memory
//! state it exclusively owns. Cards are value types: a review produces a new
//! card snapshot rather than mutating the old one.

mod content;

pub use content::{CardContent, CardContext, CardKind};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, SchedulerError};
use crate::fsrs::MemoryState;

// ============================================================================
// CARD
// ============================================================================

/// A vocabulary word or grammar pattern under review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// What the learner sees
    pub content: CardContent,
    /// Where the item was found (song, line); passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<CardContext>,
    /// FSRS state, owned by this card only
    pub memory: MemoryState,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    /// Bumped on every memory update so an external store can detect divergence
    #[serde(default)]
    pub sync_version: u64,
    /// Memory as it was before the most recent transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery: Option<MemoryState>,
}

/// Input for creating a new card
///
/// Uses `deny_unknown_fields` so typos in imported data fail loudly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCardInput {
    pub content: CardContent,
    #[serde(default)]
    pub context: Option<CardContext>,
}

impl Card {
    /// Create a never-reviewed card
    pub fn new(input: NewCardInput) -> Self {
        Self::new_at(input, Utc::now())
    }

    pub fn new_at(input: NewCardInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: input.content,
            context: input.context,
            memory: MemoryState::new(),
            created_at: now,
            last_modified: now,
            sync_version: 0,
            recovery: None,
        }
    }

    /// Parse a card record from an external store
    ///
    /// Missing or malformed memory is reported as `InvalidCardState`.
    pub fn from_json(json: &str) -> Result<Self> {
        let card: Card = serde_json::from_str(json)
            .map_err(|e| SchedulerError::InvalidCardState(e.to_string()))?;
        card.memory
            .validate()
            .map_err(|e| match e {
                SchedulerError::InvalidCardState(msg) => {
                    SchedulerError::InvalidCardState(format!("card {}: {}", card.id, msg))
                }
                other => other,
            })?;
        Ok(card)
    }

    pub fn kind(&self) -> CardKind {
        self.content.kind()
    }

    pub fn front(&self) -> &str {
        self.content.front()
    }

    pub fn back(&self) -> &str {
        self.content.back()
    }

    pub fn is_new(&self) -> bool {
        self.memory.is_new()
    }

    /// Next snapshot with `memory` applied
    pub fn with_memory(&self, memory: MemoryState, now: DateTime<Utc>) -> Card {
        Card {
            memory,
            recovery: Some(self.memory.clone()),
            last_modified: now,
            sync_version: self.sync_version + 1,
            ..self.clone()
        }
    }

    /// Snapshot with the recovery memory restored, if one exists
    ///
    /// Rolling back is itself an update, so the sync version still moves forward.
    pub fn rollback(&self, now: DateTime<Utc>) -> Option<Card> {
        let recovered = self.recovery.clone()?;
        Some(Card {
            memory: recovered,
            recovery: None,
            last_modified: now,
            sync_version: self.sync_version + 1,
            ..self.clone()
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
