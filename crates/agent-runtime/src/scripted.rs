//! Scripted Provider
//!
//! Offline provider that answers from a keyword script. Used for demos without
//! a model server and as the agent double in tests.

use agent_core::{
    error::Result,
    message::{Message, Role},
    provider::{CompletionStream, GenerationOptions, LlmProvider, StreamChunk},
};
use async_trait::async_trait;

/// One scripted rule: if the last user message contains `trigger`, answer `reply`
#[derive(Clone, Debug)]
pub struct ScriptRule {
    pub trigger: String,
    pub reply: String,
}

/// Keyword-scripted provider
#[derive(Clone, Debug)]
pub struct ScriptedProvider {
    rules: Vec<ScriptRule>,
    fallback: String,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::butler()
    }
}

impl ScriptedProvider {
    /// Provider with no rules that always answers `fallback`
    pub fn constant(fallback: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            fallback: fallback.into(),
        }
    }

    /// Canned butler answers for balance and AAVE questions
    pub fn butler() -> Self {
        Self::constant("How else may I be of assistance, sire?")
            .rule(
                "wallet balance",
                "Very good, sire. Your current wallet balance is 1.5 ETH",
            )
            .rule(
                "aave",
                "Aave positions found:\n\nAsset: USDC\nSupply Balance: 1000\nCollateral Enabled: true",
            )
    }

    /// Add a rule; earlier rules win
    #[must_use]
    pub fn rule(mut self, trigger: impl Into<String>, reply: impl Into<String>) -> Self {
        self.rules.push(ScriptRule {
            trigger: trigger.into().to_lowercase(),
            reply: reply.into(),
        });
        self
    }

    fn answer(&self, messages: &[Message]) -> &str {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.to_lowercase())
            .unwrap_or_default();

        self.rules
            .iter()
            .find(|r| last_user.contains(&r.trigger))
            .map_or(self.fallback.as_str(), |r| r.reply.as_str())
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn complete_stream(
        &self,
        messages: &[Message],
        _options: &GenerationOptions,
    ) -> Result<CompletionStream> {
        let answer = self.answer(messages);

        // Word-sized deltas so consumers see a real stream
        let words: Vec<&str> = answer.split_inclusive(' ').collect();
        let last = words.len().saturating_sub(1);
        let chunks: Vec<Result<StreamChunk>> = if words.is_empty() {
            vec![Ok(StreamChunk::last(""))]
        } else {
            words
                .into_iter()
                .enumerate()
                .map(|(i, w)| {
                    Ok(if i == last {
                        StreamChunk::last(w)
                    } else {
                        StreamChunk::delta(w)
                    })
                })
                .collect()
        };

        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}
