//! Conversation history as an explicit value.
//!
//! Turns are append-only and owned by the session; nothing outside the
//! session mutates them. History never persists past the session's lifetime.

use serde::{Deserialize, Serialize};

use crate::context::ContextSnippet;

/// Label used for the synthetic history snippet in prompt context.
pub const HISTORY_SOURCE: &str = "Conversation History";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Assistant => "Assistant",
        }
    }
}

/// One message in conversation history. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

/// Ordered turn history, insertion order = chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    turns: Vec<Turn>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn {
            speaker: Speaker::User,
            text: text.into(),
        });
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(Turn {
            speaker: Speaker::Assistant,
            text: text.into(),
        });
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Snippet rendering the full history as `Speaker: text` lines.
    ///
    /// `None` when the only turn is the message currently being processed,
    /// so a session's first prompt carries no history block.
    pub fn history_snippet(&self) -> Option<ContextSnippet> {
        if self.turns.len() <= 1 {
            return None;
        }
        let body = self
            .turns
            .iter()
            .map(|turn| format!("{}: {}", turn.speaker.label(), turn.text))
            .collect::<Vec<_>>()
            .join("\n");
        Some(ContextSnippet::new(HISTORY_SOURCE, body))
    }
}
