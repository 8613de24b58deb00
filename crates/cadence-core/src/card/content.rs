//! Card content types

use serde::{Deserialize, Serialize};

/// Kind of learnable unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Vocabulary,
    Grammar,
}

impl CardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardKind::Vocabulary => "vocabulary",
            CardKind::Grammar => "grammar",
        }
    }
}

impl std::fmt::Display for CardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display content, tagged by kind
///
/// The scheduler never interprets these strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CardContent {
    Vocabulary {
        word: String,
        meaning: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        example: Option<String>,
    },
    Grammar {
        pattern: String,
        explanation: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        example: Option<String>,
    },
}

impl CardContent {
    pub fn kind(&self) -> CardKind {
        match self {
            CardContent::Vocabulary { .. } => CardKind::Vocabulary,
            CardContent::Grammar { .. } => CardKind::Grammar,
        }
    }

    /// Prompt side
    pub fn front(&self) -> &str {
        match self {
            CardContent::Vocabulary { word, .. } => word,
            CardContent::Grammar { pattern, .. } => pattern,
        }
    }

    /// Answer side
    pub fn back(&self) -> &str {
        match self {
            CardContent::Vocabulary { meaning, .. } => meaning,
            CardContent::Grammar { explanation, .. } => explanation,
        }
    }

    pub fn example(&self) -> Option<&str> {
        match self {
            CardContent::Vocabulary { example, .. } | CardContent::Grammar { example, .. } => {
                example.as_deref()
            }
        }
    }
}

/// Provenance of a card (e.g. the song and lyric line it came from)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardContext {
    /// Source title
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    /// Anything else the host wants to keep with the card
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub extra: serde_json::Value,
}
