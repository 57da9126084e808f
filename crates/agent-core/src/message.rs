//! Conversation Messages
//!
//! LLM-facing message format. Thread memory stores these, providers consume them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message sender
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt/instructions
    System,
    /// User input
    User,
    /// Assistant (LLM) response
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a conversation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,

    pub content: String,

    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Rough token estimate (~4 characters per token plus role overhead)
    pub fn estimate_tokens(&self) -> u32 {
        u32::try_from(self.content.len() / 4).unwrap_or(u32::MAX).saturating_add(4)
    }
}

/// Ordered conversation history of one thread
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,

    /// Token budget the transcript is trimmed to
    #[serde(default = "default_token_budget")]
    token_budget: u32,
}

const fn default_token_budget() -> u32 {
    8192
}

impl Default for Transcript {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            token_budget: default_token_budget(),
        }
    }
}

impl Transcript {
    pub fn with_budget(token_budget: u32) -> Self {
        Self {
            messages: Vec::new(),
            token_budget,
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn estimate_tokens(&self) -> u32 {
        self.messages.iter().map(Message::estimate_tokens).sum()
    }

    /// Drop the oldest non-system messages until the transcript fits its budget.
    /// The newest message is always kept.
    pub fn trim_to_budget(&mut self) {
        while self.estimate_tokens() > self.token_budget && self.messages.len() > 1 {
            let Some(pos) = self.messages.iter().position(|m| m.role != Role::System) else {
                break;
            };
            if pos + 1 >= self.messages.len() {
                break;
            }
            self.messages.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
    }

    #[test]
    fn test_trim_keeps_newest_message() {
        let mut transcript = Transcript::with_budget(20);
        transcript.push(Message::user("a".repeat(40)));
        transcript.push(Message::assistant("b".repeat(40)));
        transcript.push(Message::user("latest question"));

        transcript.trim_to_budget();

        assert_eq!(transcript.messages().len(), 1);
        assert_eq!(transcript.messages()[0].content, "latest question");
    }

    #[test]
    fn test_trim_preserves_system_prompt() {
        let mut transcript = Transcript::with_budget(30);
        transcript.push(Message::system("be polite"));
        transcript.push(Message::user("x".repeat(100)));
        transcript.push(Message::user("hi"));

        transcript.trim_to_budget();

        assert_eq!(transcript.messages()[0].role, Role::System);
        assert_eq!(transcript.messages().last().unwrap().content, "hi");
    }
}
