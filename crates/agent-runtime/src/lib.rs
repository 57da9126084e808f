//! # agent-runtime
//!
//! Runtime providers for the butler agent.
//!
//! ## Providers
//!
//! - **Ollama** (default): Local LLM inference via Ollama
//! - **Scripted**: Keyword-scripted offline answers for demos and tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::OllamaProvider;
//!
//! let provider = OllamaProvider::from_env();
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

#[cfg(feature = "ollama")]
pub mod ollama;
pub mod scripted;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};
pub use scripted::{ScriptRule, ScriptedProvider};

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentBuilder, AgentError, ConversationalAgent, LlmProvider, Message, Result, Role,
    ThreadId, ThreadMemory,
};
