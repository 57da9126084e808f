//! Conversational Agent
//!
//! A single agent handle bound to a fixed system prompt. Each turn replays the
//! thread's transcript to the provider, consumes the streamed answer and, on
//! success, records the turn back into thread memory.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AgentError, Result};
use crate::memory::{ThreadId, ThreadMemory};
use crate::message::Message;
use crate::provider::{GenerationOptions, LlmProvider, collect_stream};

/// Anything that can answer a user turn within a conversation thread.
#[async_trait]
pub trait ConversationalAgent: Send + Sync {
    /// Run one turn and return the agent's final reply text.
    async fn reply(&self, thread: &ThreadId, input: &str) -> Result<String>;
}

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt prepended to every turn
    pub system_prompt: String,

    /// Generation options
    pub generation: GenerationOptions,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            generation: GenerationOptions::default(),
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. Be concise and accurate.";

/// LLM-backed agent with thread-scoped memory
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    memory: Arc<ThreadMemory>,
    config: AgentConfig,
}

impl Agent {
    pub fn new(provider: Arc<dyn LlmProvider>, memory: Arc<ThreadMemory>, config: AgentConfig) -> Self {
        Self {
            provider,
            memory,
            config,
        }
    }

    /// Messages sent to the provider for a turn: system prompt, history, new input
    async fn build_turn(&self, thread: &ThreadId, input: &str) -> Vec<Message> {
        let history = self.memory.history(thread).await;
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(&self.config.system_prompt));
        messages.extend(history);
        messages.push(Message::user(input));
        messages
    }
}

#[async_trait]
impl ConversationalAgent for Agent {
    async fn reply(&self, thread: &ThreadId, input: &str) -> Result<String> {
        let messages = self.build_turn(thread, input).await;

        let stream = self
            .provider
            .complete_stream(&messages, &self.config.generation)
            .await?;
        let reply = collect_stream(stream).await?;
        tracing::debug!(thread = %thread, chars = reply.len(), "Agent turn complete");

        self.memory
            .record_turn(thread, Message::user(input), Message::assistant(&reply))
            .await;

        Ok(reply)
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    memory: Option<Arc<ThreadMemory>>,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            memory: None,
            config: AgentConfig::default(),
        }
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn memory(mut self, memory: Arc<ThreadMemory>) -> Self {
        self.memory = Some(memory);
        self
    }

    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn generation(mut self, generation: GenerationOptions) -> Self {
        self.config.generation = generation;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;
        let memory = self.memory.unwrap_or_default();

        Ok(Agent::new(provider, memory, self.config))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::message::Role;
    use crate::provider::{CompletionStream, StreamChunk};

    /// Echoes the number of messages it received, remembers the last request
    struct CountingProvider {
        seen: Mutex<Vec<Vec<Message>>>,
    }

    #[async_trait]
    impl LlmProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete_stream(
            &self,
            messages: &[Message],
            _options: &GenerationOptions,
        ) -> Result<CompletionStream> {
            self.seen.lock().unwrap().push(messages.to_vec());
            let chunks = vec![
                Ok(StreamChunk::delta("seen ")),
                Ok(StreamChunk::last(messages.len().to_string())),
            ];
            Ok(Box::pin(futures::stream::iter(chunks)))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(false)
        }

        async fn complete_stream(
            &self,
            _messages: &[Message],
            _options: &GenerationOptions,
        ) -> Result<CompletionStream> {
            Err(AgentError::ProviderUnavailable("offline".into()))
        }
    }

    #[tokio::test]
    async fn test_reply_replays_thread_history() {
        let provider = Arc::new(CountingProvider {
            seen: Mutex::new(Vec::new()),
        });
        let agent = AgentBuilder::new()
            .provider(provider.clone())
            .system_prompt("You are Ailfred.")
            .build()
            .unwrap();
        let thread = ThreadId::from_string("butler");

        assert_eq!(agent.reply(&thread, "hello").await.unwrap(), "seen 2");
        assert_eq!(agent.reply(&thread, "again").await.unwrap(), "seen 4");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[1][0].role, Role::System);
        assert_eq!(seen[1][0].content, "You are Ailfred.");
        assert_eq!(seen[1][1].content, "hello");
        assert_eq!(seen[1][3].content, "again");
    }

    #[tokio::test]
    async fn test_failed_turn_is_not_remembered() {
        let memory = Arc::new(ThreadMemory::new());
        let agent = AgentBuilder::new()
            .provider(Arc::new(FailingProvider))
            .memory(memory.clone())
            .build()
            .unwrap();
        let thread = ThreadId::new();

        assert!(agent.reply(&thread, "hello").await.is_err());
        assert!(memory.history(&thread).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_stream_is_not_remembered() {
        struct SilentProvider;

        #[async_trait]
        impl LlmProvider for SilentProvider {
            fn name(&self) -> &str {
                "silent"
            }

            async fn health_check(&self) -> Result<bool> {
                Ok(true)
            }

            async fn complete_stream(
                &self,
                _messages: &[Message],
                _options: &GenerationOptions,
            ) -> Result<CompletionStream> {
                Ok(Box::pin(futures::stream::iter(
                    Vec::<Result<StreamChunk>>::new(),
                )))
            }
        }

        let memory = Arc::new(ThreadMemory::new());
        let agent = AgentBuilder::new()
            .provider(Arc::new(SilentProvider))
            .memory(memory.clone())
            .build()
            .unwrap();
        let thread = ThreadId::new();

        let err = agent.reply(&thread, "hello").await.unwrap_err();

        assert!(matches!(err, AgentError::EmptyCompletion));
        assert!(memory.history(&thread).await.is_empty());
    }

    #[test]
    fn test_builder_requires_provider() {
        assert!(matches!(AgentBuilder::new().build(), Err(AgentError::Config(_))));
    }
}
