//! Append-only conversation transcript
//!
//! The transcript always starts with the seed greeting and only ever grows.
//! Insertion order is the only ordering signal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Greeting shown before any user interaction
pub const SEED_GREETING: &str = "Hello, I'm LOGEAUM. You're safe here — I'm here to listen and help you make sense of what you're feeling.";

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Opaque rendering key for a turn
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(String);

impl TurnId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    id: TurnId,
    role: Role,
    content: String,
}

impl Turn {
    pub fn new(id: TurnId, role: Role, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
        }
    }

    pub fn user(id: TurnId, content: impl Into<String>) -> Self {
        Self::new(id, Role::User, content)
    }

    pub fn assistant(id: TurnId, content: impl Into<String>) -> Self {
        Self::new(id, Role::Assistant, content)
    }

    pub fn id(&self) -> &TurnId {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Wire form used as request context
    pub fn to_history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// A prior turn as sent to the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

/// Ordered, append-only sequence of turns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Create a transcript holding only the seed greeting
    pub fn new() -> Self {
        Self {
            turns: vec![Turn::assistant(TurnId::new(), SEED_GREETING)],
        }
    }

    /// Append a turn. Turns with empty content are dropped.
    pub fn append(&mut self, turn: Turn) -> bool {
        if turn.content.is_empty() {
            tracing::warn!(turn_id = %turn.id, role = turn.role.as_str(), "Dropping empty turn");
            return false;
        }
        self.turns.push(turn);
        true
    }

    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    /// Every turn after the seed greeting, in order
    pub fn prior_turns(&self) -> Vec<HistoryEntry> {
        self.turns
            .iter()
            .skip(1)
            .map(Turn::to_history_entry)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
