//! Text-generation providers.
//!
//! This module provides a unified interface for the hosted providers
//! (Gemini, Anthropic, OpenAI) and a local Ollama server.

pub mod anthropic;
pub mod gemini;
pub mod ollama;
pub mod openai;

use crate::config::{Config, ProviderConfig};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Something that turns a prompt into generated text.
///
/// The simplifier only depends on this trait, so tests can stand in a fake.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send `prompt` as the sole content and return the raw generated text.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Provider name, for logs.
    fn name(&self) -> &'static str;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}

/// Enum-based backend for the configured provider.
pub enum Backend {
    Gemini(gemini::GeminiBackend),
    Anthropic(anthropic::AnthropicBackend),
    OpenAI(openai::OpenAIBackend),
    Ollama(ollama::OllamaBackend),
}

impl Backend {
    /// Check if the backend is available/reachable.
    pub async fn health_check(&self) -> Result<()> {
        match self {
            Backend::Gemini(b) => b.health_check().await,
            Backend::Anthropic(b) => b.health_check().await,
            Backend::OpenAI(b) => b.health_check().await,
            Backend::Ollama(b) => b.health_check().await,
        }
    }
}

#[async_trait]
impl Provider for Backend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        match self {
            Backend::Gemini(b) => b.generate(prompt).await,
            Backend::Anthropic(b) => b.generate(prompt).await,
            Backend::OpenAI(b) => b.generate(prompt).await,
            Backend::Ollama(b) => b.generate(prompt).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Backend::Gemini(_) => "gemini",
            Backend::Anthropic(_) => "anthropic",
            Backend::OpenAI(_) => "openai",
            Backend::Ollama(_) => "ollama",
        }
    }

    fn model(&self) -> &str {
        match self {
            Backend::Gemini(b) => &b.model,
            Backend::Anthropic(b) => &b.model,
            Backend::OpenAI(b) => &b.model,
            Backend::Ollama(b) => &b.model,
        }
    }
}

/// Create a backend from configuration.
pub fn create_backend(config: &Config) -> Result<Backend> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }
    let client = builder.build().context("Failed to create HTTP client")?;

    let backend = match &config.provider {
        ProviderConfig::Gemini {
            model,
            host,
            api_key,
        } => Backend::Gemini(gemini::GeminiBackend::new(
            model.clone(),
            host.clone(),
            api_key.clone(),
            client,
        )),
        ProviderConfig::Anthropic {
            model,
            base_url,
            api_key,
        } => Backend::Anthropic(anthropic::AnthropicBackend::new(
            model.clone(),
            base_url.clone(),
            api_key.clone(),
            client,
        )),
        ProviderConfig::OpenAI {
            model,
            base_url,
            api_key,
        } => Backend::OpenAI(openai::OpenAIBackend::new(
            model.clone(),
            base_url.clone(),
            api_key.clone(),
            client,
        )),
        ProviderConfig::Ollama { model, host } => {
            Backend::Ollama(ollama::OllamaBackend::new(model.clone(), host.clone(), client))
        }
    };
    Ok(backend)
}
