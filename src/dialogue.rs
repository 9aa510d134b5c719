//! Remote dialogue service client
//!
//! Sends a user utterance plus prior turns to the conversational service and
//! returns its structured reply.

mod error;
mod http;
mod types;

pub use error::{DialogueError, DialogueErrorKind};
pub use http::HttpDialogueClient;
pub use types::{Resource, Severity, StructuredReply};

use crate::transcript::HistoryEntry;
use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for dialogue backends
#[async_trait]
pub trait DialogueService: Send + Sync {
    /// Perform one request/response round trip
    async fn send(
        &self,
        utterance: &str,
        prior_turns: &[HistoryEntry],
    ) -> Result<StructuredReply, DialogueError>;

    /// Where requests go, for logging
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: DialogueService + ?Sized> DialogueService for Arc<T> {
    async fn send(
        &self,
        utterance: &str,
        prior_turns: &[HistoryEntry],
    ) -> Result<StructuredReply, DialogueError> {
        (**self).send(utterance, prior_turns).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

/// Logging wrapper for dialogue services
pub struct LoggingService {
    inner: Arc<dyn DialogueService>,
    endpoint: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn DialogueService>) -> Self {
        let endpoint = inner.endpoint().to_string();
        Self { inner, endpoint }
    }
}

#[async_trait]
impl DialogueService for LoggingService {
    async fn send(
        &self,
        utterance: &str,
        prior_turns: &[HistoryEntry],
    ) -> Result<StructuredReply, DialogueError> {
        let start = std::time::Instant::now();
        let result = self.inner.send(utterance, prior_turns).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    history_len = prior_turns.len(),
                    severity = %reply.severity,
                    suggestions = reply.suggestions.len(),
                    resources = reply.resources.len(),
                    "Dialogue request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    history_len = prior_turns.len(),
                    error_kind = e.kind.as_str(),
                    error = %e.message,
                    "Dialogue request failed"
                );
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
