//! Mock implementations for testing
//!
//! These mocks enable integration testing of the runtime without real I/O.

use crate::dialogue::{DialogueError, DialogueService, StructuredReply};
use crate::transcript::HistoryEntry;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// A recorded call to a mock dialogue client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub utterance: String,
    pub history: Vec<HistoryEntry>,
}

// ============================================================================
// Mock Dialogue Client
// ============================================================================

/// Mock dialogue client that returns queued replies
pub struct MockDialogueClient {
    replies: Mutex<VecDeque<Result<StructuredReply, DialogueError>>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<RecordedRequest>>,
}

impl MockDialogueClient {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, reply: StructuredReply) {
        self.replies.lock().unwrap().push_back(Ok(reply));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: DialogueError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockDialogueClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DialogueService for MockDialogueClient {
    async fn send(
        &self,
        utterance: &str,
        prior_turns: &[HistoryEntry],
    ) -> Result<StructuredReply, DialogueError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            utterance: utterance.to_string(),
            history: prior_turns.to_vec(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DialogueError::network("No mock reply queued")))
    }

    fn endpoint(&self) -> &str {
        "mock://chat"
    }
}

// ============================================================================
// Delayed Mock Dialogue Client (for busy-state testing)
// ============================================================================

/// Mock dialogue client that holds each request for a while
pub struct DelayedMockDialogueClient {
    inner: MockDialogueClient,
    delay: Duration,
    /// Notified when a request starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl DelayedMockDialogueClient {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockDialogueClient::new(),
            delay,
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_reply(&self, reply: StructuredReply) {
        self.inner.queue_reply(reply);
    }

    pub fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.inner.recorded_requests()
    }
}

#[async_trait]
impl DialogueService for DelayedMockDialogueClient {
    async fn send(
        &self,
        utterance: &str,
        prior_turns: &[HistoryEntry],
    ) -> Result<StructuredReply, DialogueError> {
        self.request_started.notify_one();
        tokio::time::sleep(self.delay).await;
        self.inner.send(utterance, prior_turns).await
    }

    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}

// ============================================================================
// Panicking Dialogue Client
// ============================================================================

/// Dialogue client whose request task panics
pub struct PanickingDialogueClient;

#[async_trait]
impl DialogueService for PanickingDialogueClient {
    async fn send(
        &self,
        _utterance: &str,
        _prior_turns: &[HistoryEntry],
    ) -> Result<StructuredReply, DialogueError> {
        panic!("dialogue client blew up");
    }

    fn endpoint(&self) -> &str {
        "mock://panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::{Resource, Severity};
    use crate::fallback::degraded_message;
    use crate::format::format_reply;
    use crate::runtime::{spawn_conversation, ConversationEvent, ConversationHandle};
    use crate::state_machine::ReplyOutcome;
    use crate::transcript::{Role, Turn, SEED_GREETING};

    async fn wait_for_turns(handle: &ConversationHandle, count: usize) -> Vec<Turn> {
        let mut rx = handle.transcript();
        tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|t| t.len() >= count))
            .await
            .expect("timed out waiting for transcript")
            .expect("runtime stopped");
        handle.snapshot()
    }

    async fn next_rejection(events: &mut tokio::sync::broadcast::Receiver<ConversationEvent>) -> String {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if let ConversationEvent::Rejected { message } = events.recv().await.unwrap() {
                    return message;
                }
            }
        })
        .await
        .expect("timed out waiting for rejection")
    }

    #[tokio::test]
    async fn test_mock_dialogue_client() {
        let mock = MockDialogueClient::new();
        mock.queue_reply(StructuredReply::new("hello", Severity::Low));

        let reply = mock.send("hi", &[]).await.unwrap();
        assert_eq!(reply.response, "hello");

        // Empty queue falls back to an error
        assert!(mock.send("again", &[]).await.is_err());
        assert_eq!(mock.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_initial_state() {
        let handle = spawn_conversation(MockDialogueClient::new());
        let turns = handle.snapshot();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role(), Role::Assistant);
        assert_eq!(turns[0].content(), SEED_GREETING);
        assert!(!handle.is_busy());
    }

    #[tokio::test]
    async fn test_simple_reply() {
        let mock = Arc::new(MockDialogueClient::new());
        let reply = StructuredReply::new("That sounds exhausting.", Severity::Moderate)
            .with_suggestion("Try a short walk");
        mock.queue_reply(reply.clone());

        let handle = spawn_conversation(mock.clone());
        handle.submit("Work has been a lot lately").await.unwrap();

        let turns = wait_for_turns(&handle, 3).await;
        assert_eq!(turns[1].role(), Role::User);
        assert_eq!(turns[1].content(), "Work has been a lot lately");
        assert_eq!(turns[2].role(), Role::Assistant);
        assert_eq!(turns[2].content(), format_reply(&reply));
        assert!(!handle.is_busy());

        let requests = mock.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].utterance, "Work has been a lot lately");
        assert!(requests[0].history.is_empty());
    }

    #[tokio::test]
    async fn test_failure_appends_fallback() {
        let mock = Arc::new(MockDialogueClient::new());
        mock.queue_error(DialogueError::http_status("HTTP 502 Bad Gateway"));

        let handle = spawn_conversation(mock);
        handle.submit("hello?").await.unwrap();

        let turns = wait_for_turns(&handle, 3).await;
        assert_eq!(turns[2].role(), Role::Assistant);
        assert_eq!(turns[2].content(), degraded_message());
        assert!(!handle.is_busy());
    }

    #[tokio::test]
    async fn test_panicking_client_degrades() {
        let handle = spawn_conversation(PanickingDialogueClient);
        handle.submit("hello").await.unwrap();

        let turns = wait_for_turns(&handle, 3).await;
        assert_eq!(turns[2].content(), degraded_message());
        assert!(!handle.is_busy());
    }

    #[tokio::test]
    async fn test_reply_lands_after_handle_dropped() {
        let mock = Arc::new(MockDialogueClient::new());
        mock.queue_reply(StructuredReply::new("Still here.", Severity::Low));

        let handle = spawn_conversation(mock.clone());
        let mut transcript = handle.transcript();
        let busy = handle.busy();

        handle.submit("hello").await.unwrap();
        drop(handle);

        let _ = tokio::time::timeout(Duration::from_secs(2), transcript.wait_for(|t| t.len() >= 3)).await;

        let turns = transcript.borrow().snapshot().to_vec();
        let roles: Vec<_> = turns.iter().map(Turn::role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(turns[2].content(), "Still here.\n\n");
        assert!(!*busy.borrow());
        assert_eq!(mock.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_http_error_status_renders_fallback() {
        use crate::dialogue::HttpDialogueClient;
        use axum::{http::StatusCode, routing::post, Router};

        let router = Router::new().route(
            "/chat",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let handle = spawn_conversation(HttpDialogueClient::with_client(
            client,
            &format!("http://{addr}"),
        ));
        handle.submit("Is anyone there?").await.unwrap();

        let turns = wait_for_turns(&handle, 3).await;
        assert_eq!(turns[1].content(), "Is anyone there?");
        assert_eq!(turns[2].role(), Role::Assistant);
        assert_eq!(turns[2].content(), degraded_message());
        assert!(!handle.is_busy());
    }

    #[tokio::test]
    async fn test_event_order_for_one_cycle() {
        let mock = Arc::new(MockDialogueClient::new());
        mock.queue_reply(StructuredReply::new("I'm listening.", Severity::Low));

        let handle = spawn_conversation(mock);
        let mut events = handle.subscribe();
        handle.submit("Can we talk?").await.unwrap();

        let mut seen = Vec::new();
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let event = events.recv().await.unwrap();
                let done = matches!(event, ConversationEvent::ReplySettled { .. });
                seen.push(event);
                if done {
                    break;
                }
            }
        })
        .await
        .expect("timed out waiting for reply");

        assert_eq!(seen.len(), 5);
        assert!(matches!(&seen[0], ConversationEvent::TurnAppended { turn } if turn.role() == Role::User));
        assert!(matches!(seen[1], ConversationEvent::BusyChanged { busy: true }));
        assert!(matches!(seen[2], ConversationEvent::BusyChanged { busy: false }));
        assert!(matches!(&seen[3], ConversationEvent::TurnAppended { turn } if turn.role() == Role::Assistant));
        assert!(matches!(
            seen[4],
            ConversationEvent::ReplySettled {
                outcome: ReplyOutcome::Rendered
            }
        ));
    }

    #[tokio::test]
    async fn test_submit_while_busy_is_ignored() {
        let client = Arc::new(DelayedMockDialogueClient::new(Duration::from_millis(200)));
        client.queue_reply(StructuredReply::new("first reply", Severity::Low));
        client.queue_reply(StructuredReply::new("should never be used", Severity::Low));
        let request_started = client.request_started.clone();

        let handle = spawn_conversation(client.clone());
        let mut events = handle.subscribe();

        handle.submit("first").await.unwrap();
        tokio::time::timeout(Duration::from_secs(2), request_started.notified())
            .await
            .expect("request should start");
        assert!(handle.is_busy());

        handle.submit("second").await.unwrap();
        let message = next_rejection(&mut events).await;
        assert!(message.contains("pending"));

        let turns = wait_for_turns(&handle, 3).await;
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1].content(), "first");
        assert_eq!(turns[2].content(), "first reply\n\n");
        assert_eq!(client.recorded_requests().len(), 1);
        assert!(!handle.is_busy());
    }

    #[tokio::test]
    async fn test_empty_submit_is_ignored() {
        let mock = Arc::new(MockDialogueClient::new());
        let handle = spawn_conversation(mock.clone());
        let mut events = handle.subscribe();

        handle.submit("   ").await.unwrap();
        let message = next_rejection(&mut events).await;
        assert!(message.contains("empty"));

        assert_eq!(handle.snapshot().len(), 1);
        assert!(mock.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn test_history_round_trip() {
        let mock = Arc::new(MockDialogueClient::new());
        mock.queue_reply(StructuredReply::new("one back", Severity::Low));
        mock.queue_error(DialogueError::network("connection reset"));
        mock.queue_reply(
            StructuredReply::new("three back", Severity::Crisis)
                .with_resource(Resource::new("988 Lifeline", "988", "24/7")),
        );

        let handle = spawn_conversation(mock.clone());
        for (i, text) in ["one", "two", "three"].into_iter().enumerate() {
            handle.submit(text).await.unwrap();
            wait_for_turns(&handle, 3 + i * 2).await;
        }

        let turns = handle.snapshot();
        assert_eq!(turns.len(), 7);

        let requests = mock.recorded_requests();
        assert_eq!(requests.len(), 3);
        for (n, request) in requests.iter().enumerate() {
            // Nth call sees every non-seed turn from calls 1..N-1
            let expected: Vec<HistoryEntry> = turns[1..=n * 2]
                .iter()
                .map(Turn::to_history_entry)
                .collect();
            assert_eq!(request.history, expected);
        }
        assert_eq!(requests[2].history[3].content, degraded_message());
    }

    #[tokio::test]
    async fn test_roles_alternate_over_many_turns() {
        let mock = Arc::new(MockDialogueClient::new());
        for i in 0..5 {
            if i % 2 == 0 {
                mock.queue_reply(StructuredReply::new(format!("reply {i}"), Severity::High));
            } else {
                mock.queue_error(DialogueError::malformed_reply("bad body"));
            }
        }

        let handle = spawn_conversation(mock);
        for i in 0..5 {
            handle.submit(format!("message {i}")).await.unwrap();
            wait_for_turns(&handle, 3 + i * 2).await;
        }

        let turns = handle.snapshot();
        assert_eq!(turns.len(), 11);
        for (i, turn) in turns.iter().enumerate() {
            let expected = if i % 2 == 0 { Role::Assistant } else { Role::User };
            assert_eq!(turn.role(), expected);
        }
    }
}
