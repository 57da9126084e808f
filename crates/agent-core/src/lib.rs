//! # agent-core
//!
//! Provider-agnostic LLM abstraction and a conversational agent with
//! thread-scoped memory.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                       Agent                          │
//! │  ┌──────────────┐  ┌─────────────┐  ┌─────────────┐  │
//! │  │ System prompt│──│ThreadMemory │──│ LlmProvider │  │
//! │  │              │  │ (per thread)│  │ (Strategy)  │  │
//! │  └──────────────┘  └─────────────┘  └─────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait lets the agent run against Ollama, a scripted
//! provider, or any other backend without changing agent logic.

pub mod agent;
pub mod error;
pub mod memory;
pub mod message;
pub mod provider;

pub use agent::{Agent, AgentBuilder, AgentConfig, ConversationalAgent};
pub use error::{AgentError, Result};
pub use memory::{ThreadId, ThreadMemory};
pub use message::{Message, Role, Transcript};
pub use provider::{GenerationOptions, LlmProvider};
