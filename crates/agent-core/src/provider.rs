//! LLM Provider Strategy Pattern
//!
//! Defines a common interface for LLM backends (Ollama, scripted, ...) so the
//! agent never depends on a concrete provider.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_core::provider::{GenerationOptions, LlmProvider};
//!
//! let provider = OllamaProvider::from_env();
//! let mut stream = provider.complete_stream(&messages, &GenerationOptions::default()).await?;
//! ```

use std::pin::Pin;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::message::Message;

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "llama3.2")
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

const fn default_temperature() -> f32 {
    0.3
}

const fn default_max_tokens() -> u32 {
    2048
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "llama3.2".into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// A chunk from streaming completion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreamChunk {
    /// The text delta
    pub delta: String,

    /// Whether this is the final chunk
    pub done: bool,
}

impl StreamChunk {
    pub fn delta(text: impl Into<String>) -> Self {
        Self {
            delta: text.into(),
            done: false,
        }
    }

    pub fn last(text: impl Into<String>) -> Self {
        Self {
            delta: text.into(),
            done: true,
        }
    }
}

/// Stream type for completion streaming
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<StreamChunk>> + Send>>;

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new LLM backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logs and health output
    fn name(&self) -> &str;

    /// Check if the provider is available and configured correctly
    async fn health_check(&self) -> Result<bool>;

    /// Generate a streaming completion
    async fn complete_stream(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<CompletionStream>;
}

/// Concatenate stream deltas until the provider reports `done` or the stream ends.
pub async fn collect_stream(mut stream: CompletionStream) -> Result<String> {
    let mut text = String::new();
    let mut chunks = 0usize;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        chunks += 1;
        text.push_str(&chunk.delta);
        if chunk.done {
            break;
        }
    }

    tracing::debug!(chunks, chars = text.len(), "Completion stream drained");

    if chunks == 0 {
        return Err(AgentError::EmptyCompletion);
    }
    Ok(text)
}
