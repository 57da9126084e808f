//! Server Configuration

use std::str::FromStr;

use anyhow::Context;
use defi_butler::ButlerConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Which LLM backend answers agent turns
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProviderKind {
    #[default]
    Ollama,
    /// Offline keyword script, no model server needed
    Scripted,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "scripted" => Ok(Self::Scripted),
            other => anyhow::bail!("unknown AGENT_PROVIDER `{other}` (expected ollama or scripted)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub provider: ProviderKind,
    pub butler: ButlerConfig,
}

impl ServerConfig {
    /// `BIND_ADDR` and `AGENT_PROVIDER`, plus everything [`ButlerConfig::from_env`] reads
    pub fn from_env() -> anyhow::Result<Self> {
        let provider = match std::env::var("AGENT_PROVIDER") {
            Ok(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => ProviderKind::default(),
        };

        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into()),
            provider,
            butler: ButlerConfig::from_env().context("invalid butler configuration")?,
        })
    }
}
