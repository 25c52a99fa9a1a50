use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the conversation and return every candidate output, in service order.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Vec<String>>;
}

// Only `BySection` is reachable from the binary
#[allow(dead_code)]
enum MockBehavior {
    BySection,
    Fixed(String),
    Empty,
    Fail(String),
}

/// In-process stand-in for the completion service, used by `--dry-run` and tests.
pub struct MockLlmClient {
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlmClient {
    /// Answers with a canned listing draft that matches the requesting agent.
    pub fn new() -> Self {
        Self::with_behavior(MockBehavior::BySection)
    }

    /// Answers every call with the same text.
    #[allow(dead_code)]
    pub fn with_response(text: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Fixed(text.into()))
    }

    /// Answers every call with zero candidates.
    #[allow(dead_code)]
    pub fn empty() -> Self {
        Self::with_behavior(MockBehavior::Empty)
    }

    /// Fails every call with the given message.
    #[allow(dead_code)]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Fail(message.into()))
    }

    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of completed `complete` calls.
    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let system = messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        match &self.behavior {
            MockBehavior::Fixed(text) => Ok(vec![text.clone()]),
            MockBehavior::Empty => Ok(Vec::new()),
            MockBehavior::Fail(message) => bail!("{}", message),
            MockBehavior::BySection => {
                let text = if system.contains("You are the Store Listing Agent") {
                    r#"{
  "display_name": "Mock Extension",
  "summary": "A mock summary.",
  "detailed_description": "Generated without contacting the completion service.",
  "language": "en",
  "category": "Developer Tools",
  "official_website": "",
  "support_contact": ""
}"#
                } else if system.contains("You are the Privacy Practices Agent") {
                    r#"{
  "single_purpose": "Mock purpose.",
  "permission_justifications": {},
  "user_data_usage": {"PII": "No", "analytics": "No"},
  "privacy_policy_url": null,
  "remote_code": "No",
  "content_security_policy": "script-src 'self'; object-src 'self';"
}"#
                } else if system.contains("You are the Distribution Agent") {
                    r#"{
  "visibility": "Public",
  "countries": ["All regions"],
  "pricing_payments": "Free extension. No payments required."
}"#
                } else {
                    r#"{"status": "mock"}"#
                };
                Ok(vec![text.to_string()])
            }
        }
    }
}
