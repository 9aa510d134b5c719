//! HTTP implementation of the dialogue service

use super::types::{ChatRequest, StructuredReply};
use super::{DialogueError, DialogueService};
use crate::transcript::HistoryEntry;
use async_trait::async_trait;
use reqwest::Client;

/// Talks to `POST {base_url}/chat`
pub struct HttpDialogueClient {
    client: Client,
    endpoint: String,
}

impl HttpDialogueClient {
    pub fn new(base_url: &str) -> Result<Self, DialogueError> {
        // No timeout: a request runs until the transport gives up
        let client = Client::builder()
            .user_agent(concat!("logeaum/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DialogueError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Use a preconfigured reqwest client
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/chat", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl DialogueService for HttpDialogueClient {
    async fn send(
        &self,
        utterance: &str,
        prior_turns: &[HistoryEntry],
    ) -> Result<StructuredReply, DialogueError> {
        if utterance.trim().is_empty() {
            return Err(DialogueError::invalid_request("Utterance is empty"));
        }

        let request = ChatRequest {
            text: utterance,
            conversation_history: prior_turns,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    DialogueError::network(format!("Connection failed: {e}"))
                } else {
                    DialogueError::network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DialogueError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(DialogueError::http_status(format!("HTTP {status}: {body}")));
        }

        serde_json::from_str(&body).map_err(|e| {
            DialogueError::malformed_reply(format!("Failed to parse reply: {e} - body: {body}"))
        })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
