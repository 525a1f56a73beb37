//! OpenAI backend implementation.
//!
//! Uses the Chat Completions API with GPT models.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// OpenAI backend for GPT API.
pub struct OpenAIBackend {
    pub model: String,
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl OpenAIBackend {
    /// Create a new OpenAI backend.
    pub fn new(model: String, base_url: String, api_key: Option<String>, client: Client) -> Self {
        Self {
            model,
            base_url,
            api_key,
            client,
        }
    }

    /// Get the API key from config or environment.
    fn get_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                anyhow!(
                    "OpenAI API key not found. Set OPENAI_API_KEY environment variable \
                     or add api_key to config file."
                )
            })
    }

    /// Send the prompt as the sole user message and return the reply text.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.get_api_key()?;
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));

        let request = OpenAIRequest {
            model: self.model.clone(),
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to connect to OpenAI API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body: Result<OpenAIError, _> = response.json().await;
            let message = body
                .map(|e| e.error.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!(
                "OpenAI API request failed with status {}: {}",
                status,
                message
            ));
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        openai_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow!("Empty response from OpenAI"))
    }

    /// Check if the backend is available/reachable.
    pub async fn health_check(&self) -> Result<()> {
        self.get_api_key()?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessageResponse,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessageResponse {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    error: OpenAIErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn backend(server: &MockServer) -> OpenAIBackend {
        OpenAIBackend::new(
            "gpt-4o-mini".to_string(),
            server.base_url(),
            Some("test-key".to_string()),
            Client::new(),
        )
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("Authorization", "Bearer test-key");
            then.status(200).json_body(json!({
                "choices": [{ "message": { "role": "assistant", "content": "Short text." } }]
            }));
        });

        let text = backend(&server).generate("prompt").await.unwrap();
        mock.assert();
        assert_eq!(text, "Short text.");
    }

    #[tokio::test]
    async fn test_generate_null_content_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({
                "choices": [{ "message": { "role": "assistant", "content": null } }]
            }));
        });

        let err = backend(&server).generate("prompt").await.unwrap_err();
        assert!(err.to_string().contains("Empty response from OpenAI"));
    }

    #[tokio::test]
    async fn test_generate_error_status_carries_api_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(429).json_body(json!({
                "error": { "message": "Rate limit reached", "type": "requests" }
            }));
        });

        let err = backend(&server).generate("prompt").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("status 429"));
        assert!(message.contains("Rate limit reached"));
    }

    #[tokio::test]
    async fn test_generate_error_status_without_json_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(502).body("Bad Gateway");
        });

        let err = backend(&server).generate("prompt").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("status 502"));
        assert!(message.contains("Unknown error"));
    }
}
