//! Thread Memory
//!
//! Conversation memory keyed by thread id. Every turn sent to the agent under
//! the same thread id sees the transcript of the previous turns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::message::{Message, Transcript};

/// Conversation thread identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(String);

impl ThreadId {
    /// Random thread id
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ThreadId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// In-process conversation memory for all threads
pub struct ThreadMemory {
    threads: RwLock<HashMap<ThreadId, Transcript>>,
    token_budget: u32,
}

impl Default for ThreadMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadMemory {
    pub fn new() -> Self {
        Self::with_budget(8192)
    }

    /// Memory whose transcripts are trimmed to `token_budget` estimated tokens
    pub fn with_budget(token_budget: u32) -> Self {
        Self {
            threads: RwLock::new(HashMap::new()),
            token_budget,
        }
    }

    /// Snapshot of a thread's history (empty for unknown threads)
    pub async fn history(&self, thread: &ThreadId) -> Vec<Message> {
        self.threads
            .read()
            .await
            .get(thread)
            .map(|t| t.messages().to_vec())
            .unwrap_or_default()
    }

    /// Append a completed turn to a thread
    pub async fn record_turn(&self, thread: &ThreadId, user: Message, assistant: Message) {
        let mut threads = self.threads.write().await;
        let transcript = threads
            .entry(thread.clone())
            .or_insert_with(|| Transcript::with_budget(self.token_budget));
        transcript.push(user);
        transcript.push(assistant);
        transcript.trim_to_budget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    #[tokio::test]
    async fn test_turns_accumulate_per_thread() {
        let memory = ThreadMemory::new();
        let butler = ThreadId::from_string("Ailfred DeFi Butler");
        let other = ThreadId::new();

        memory
            .record_turn(&butler, Message::user("hello"), Message::assistant("good day"))
            .await;
        memory
            .record_turn(&butler, Message::user("balance?"), Message::assistant("1 ETH"))
            .await;

        let history = memory.history(&butler).await;
        assert_eq!(history.len(), 4);
        assert_eq!(history[3].role, Role::Assistant);
        assert!(memory.history(&other).await.is_empty());
    }

    #[tokio::test]
    async fn test_history_is_trimmed_to_budget() {
        let memory = ThreadMemory::with_budget(20);
        let thread = ThreadId::new();
        memory
            .record_turn(&thread, Message::user("a".repeat(80)), Message::assistant("ok"))
            .await;

        let history = memory.history(&thread).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "ok");
    }
}
