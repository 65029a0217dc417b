//! Append-only record of a conversation.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message, stamped when it was recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    /// Serialised as an ISO-8601 / RFC 3339 string.
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationLog {
    history: Vec<ConversationTurn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_message(&mut self, role: Role, content: impl Into<String>) {
        self.history.push(ConversationTurn {
            role,
            content: content.into(),
            timestamp: Local::now(),
        });
    }

    /// Turns in the order they were added.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.history.last()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
