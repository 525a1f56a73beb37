//! Google Gemini backend implementation.
//!
//! Uses the `generateContent` endpoint of the Generative Language API.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Gemini backend for the Generative Language API.
pub struct GeminiBackend {
    pub model: String,
    host: String,
    api_key: Option<String>,
    client: Client,
}

impl GeminiBackend {
    /// Create a new Gemini backend.
    pub fn new(model: String, host: String, api_key: Option<String>, client: Client) -> Self {
        Self {
            model,
            host,
            api_key,
            client,
        }
    }

    /// Get the API key from config or environment.
    fn get_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("API_KEY").ok())
            .ok_or_else(|| {
                anyhow!(
                    "Gemini API key not found. Set GEMINI_API_KEY (or API_KEY) environment \
                     variable or add api_key to config file."
                )
            })
    }

    /// Send the prompt as the sole content and return the generated text.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.get_api_key()?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.host.trim_end_matches('/'),
            self.model
        );

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to connect to Gemini API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body: Result<GeminiError, _> = response.json().await;
            let message = body
                .map(|e| e.error.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!(
                "Gemini API request failed with status {}: {}",
                status,
                message
            ));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        let text = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow!("Empty response from Gemini"))?;

        Ok(text)
    }

    /// Check if the backend is available/reachable.
    pub async fn health_check(&self) -> Result<()> {
        self.get_api_key()?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn backend(server: &MockServer) -> GeminiBackend {
        GeminiBackend::new(
            "gemini-2.5-flash".to_string(),
            server.base_url(),
            Some("test-key".to_string()),
            Client::new(),
        )
    }

    #[tokio::test]
    async fn test_generate_joins_parts() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.5-flash:generateContent")
                .header("x-goog-api-key", "test-key")
                .json_body(json!({ "contents": [{ "parts": [{ "text": "prompt" }] }] }));
            then.status(200).json_body(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "Hello " }, { "text": "world." }], "role": "model" }
                }]
            }));
        });

        let text = backend(&server).generate("prompt").await.unwrap();
        mock.assert();
        assert_eq!(text, "Hello world.");
    }

    #[tokio::test]
    async fn test_generate_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(403)
                .json_body(json!({ "error": { "code": 403, "message": "API key not valid" } }));
        });

        let err = backend(&server).generate("prompt").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("403"));
        assert!(message.contains("API key not valid"));
    }

    #[tokio::test]
    async fn test_generate_empty_candidates() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({ "candidates": [] }));
        });

        let err = backend(&server).generate("prompt").await.unwrap_err();
        assert!(err.to_string().contains("Empty response"));
    }

    #[tokio::test]
    async fn test_generate_malformed_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(200).body("not json");
        });

        let err = backend(&server).generate("prompt").await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse Gemini response"));
    }
}
