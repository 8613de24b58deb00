//! In-memory card store

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{CardStore, Result, StoreError};
use crate::card::Card;
use crate::session::ReviewLog;

/// Serializable image of a whole store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub cards: Vec<Card>,
    pub logs: Vec<ReviewLog>,
}

/// `HashMap`-backed store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    cards: HashMap<String, Card>,
    logs: Vec<ReviewLog>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Store cards in bulk, applying the same version check as `save`
    pub fn insert_all(&mut self, cards: impl IntoIterator<Item = Card>) -> Result<()> {
        for card in cards {
            self.save(card)?;
        }
        Ok(())
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let mut cards: Vec<Card> = self.cards.values().cloned().collect();
        cards.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        StoreSnapshot {
            cards,
            logs: self.logs.clone(),
        }
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Replace the store's contents with a previously exported snapshot
    pub fn import_json(json: &str) -> Result<Self> {
        let snapshot: StoreSnapshot = serde_json::from_str(json)?;
        let cards = snapshot
            .cards
            .into_iter()
            .map(|card| (card.id.clone(), card))
            .collect();

        tracing::debug!(logs = snapshot.logs.len(), "store imported");
        Ok(Self {
            cards,
            logs: snapshot.logs,
        })
    }
}

impl CardStore for InMemoryStore {
    fn load(&self, id: &str) -> Result<Card> {
        self.cards
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn save(&mut self, card: Card) -> Result<()> {
        if let Some(stored) = self.cards.get(&card.id) {
            if card.sync_version <= stored.sync_version {
                tracing::warn!(
                    card_id = %card.id,
                    stored = stored.sync_version,
                    incoming = card.sync_version,
                    "rejected stale card save"
                );
                return Err(StoreError::VersionConflict {
                    id: card.id,
                    stored: stored.sync_version,
                    incoming: card.sync_version,
                });
            }
        }
        self.cards.insert(card.id.clone(), card);
        Ok(())
    }

    fn all(&self) -> Result<Vec<Card>> {
        Ok(self.cards.values().cloned().collect())
    }

    fn append_log(&mut self, log: ReviewLog) -> Result<()> {
        self.logs.push(log);
        Ok(())
    }

    fn logs(&self) -> Result<Vec<ReviewLog>> {
        Ok(self.logs.clone())
    }
}
