use tracing::{error, info};

use crate::error::ListingError;
use crate::llm::client::{ChatMessage, LlmClient};
use crate::llm::prompts::ListingSection;

/// One listing agent: a fixed system prompt plus the shared context.
pub struct ListingAgent<'a> {
    client: &'a dyn LlmClient,
    section: ListingSection,
}

impl<'a> ListingAgent<'a> {
    pub fn new(client: &'a dyn LlmClient, section: ListingSection) -> Self {
        Self { client, section }
    }

    /// Ask the model for this section and return its first candidate.
    pub async fn run(&self, context_json: &str) -> Result<String, ListingError> {
        info!("Starting {}...", self.section.agent_name());

        let messages = [
            ChatMessage::system(self.section.prompt()),
            ChatMessage::user(context_json),
        ];

        let result = match self.client.complete(&messages).await {
            Ok(choices) => choices.into_iter().next().ok_or(ListingError::NoChoices),
            Err(e) => Err(ListingError::ServiceFailure(format!("{:#}", e))),
        };

        if let Err(ref e) = result {
            error!("{} failed: {}", self.section.agent_name(), e);
        }
        result
    }
}
