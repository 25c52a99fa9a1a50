use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::client::{ChatMessage, LlmClient};
use crate::config::CompletionConfig;
use crate::util::SecretString;

// ============================================================================
// Azure AI inference client
// ============================================================================

pub struct AzureOpenAIClient {
    api_key: SecretString,
    endpoint: String,
    model: String,
    api_version: String,
    max_tokens: u32,
    client: Client,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    messages: &'a [ChatMessage],
    max_tokens: u32,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl AzureOpenAIClient {
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_version: config.api_version.clone(),
            max_tokens: config.max_tokens,
            client: builder.build().context("failed to build HTTP client")?,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/chat/completions?api-version={}",
            self.endpoint, self.api_version
        )
    }
}

#[async_trait]
impl LlmClient for AzureOpenAIClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Vec<String>> {
        let request = CompletionRequest {
            messages,
            max_tokens: self.max_tokens,
            model: &self.model,
        };

        debug!(
            "Calling completion API at {} with model: {}",
            self.endpoint, self.model
        );

        let response = self
            .client
            .post(self.url())
            .header("api-key", self.api_key.expose())
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to completion API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            bail!("Completion API error {}: {}", status, error_text);
        }

        let api_response: CompletionResponse = response
            .json()
            .await
            .context("Failed to parse completion API response")?;

        Ok(api_response
            .choices
            .into_iter()
            .map(|c| c.message.content.unwrap_or_default())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CompletionConfig {
        CompletionConfig {
            endpoint: "https://example.services.ai.azure.com/models/".to_string(),
            api_key: SecretString::new("test_key".to_string()),
            model: "gpt-4o".to_string(),
            api_version: "2024-05-01-preview".to_string(),
            max_tokens: 2048,
            timeout_secs: None,
        }
    }

    #[test]
    fn test_client_creation() {
        let client = AzureOpenAIClient::new(&config()).unwrap();
        assert_eq!(client.api_key.expose(), "test_key");
        assert_eq!(client.model, "gpt-4o");
        assert_eq!(client.max_tokens, 2048);
        assert_eq!(
            client.url(),
            "https://example.services.ai.azure.com/models/chat/completions?api-version=2024-05-01-preview"
        );
    }

    #[test]
    fn test_request_structure() {
        let messages = vec![ChatMessage::system("prompt"), ChatMessage::user("context")];
        let request = CompletionRequest {
            messages: &messages,
            max_tokens: 2048,
            model: "gpt-4o",
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["max_tokens"], 2048);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "prompt");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "context");
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "id": "cmpl-1",
            "choices": [
                {"index": 0, "finish_reason": "stop",
                 "message": {"role": "assistant", "content": "Hello, world!"}}
            ]
        }"#;

        let response: CompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.choices[0].message.content.as_deref(),
            Some("Hello, world!")
        );
    }

    #[test]
    fn test_response_empty_choices() {
        let response: CompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(response.choices.is_empty());

        let response: CompletionResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(response.choices.is_empty());
    }

    #[test]
    fn test_response_null_content() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let response: CompletionResponse = serde_json::from_str(json).unwrap();
        assert!(response.choices[0].message.content.is_none());
    }
}
