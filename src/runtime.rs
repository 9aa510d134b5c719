//! Runtime for executing a conversation
//!
//! Owns the transcript and busy flag, feeds events through the state machine
//! and publishes every change to the presentation layer.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::ConversationRuntime;

use crate::dialogue::DialogueService;
use crate::state_machine::{Event, ReplyOutcome};
use crate::transcript::{Transcript, Turn};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch};

/// Events sent to presentation observers
#[derive(Debug, Clone)]
pub enum ConversationEvent {
    TurnAppended { turn: Turn },
    BusyChanged { busy: bool },
    ReplySettled { outcome: ReplyOutcome },
    /// A submission was ignored (busy or empty)
    Rejected { message: String },
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Conversation runtime has stopped")]
    Closed,
}

/// Handle to interact with a running conversation
///
/// Cloning is cheap; every clone talks to the same runtime.
#[derive(Clone)]
pub struct ConversationHandle {
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<ConversationEvent>,
    transcript_rx: watch::Receiver<Transcript>,
    busy_rx: watch::Receiver<bool>,
}

impl ConversationHandle {
    /// Submit user text. Submissions made while a reply is pending are ignored.
    pub async fn submit(&self, text: impl Into<String>) -> Result<(), RuntimeError> {
        self.event_tx
            .send(Event::user_submit(text))
            .await
            .map_err(|_| RuntimeError::Closed)
    }

    pub fn is_busy(&self) -> bool {
        *self.busy_rx.borrow()
    }

    pub fn busy(&self) -> watch::Receiver<bool> {
        self.busy_rx.clone()
    }

    /// Current turns, oldest first
    pub fn snapshot(&self) -> Vec<Turn> {
        self.transcript_rx.borrow().snapshot().to_vec()
    }

    pub fn transcript(&self) -> watch::Receiver<Transcript> {
        self.transcript_rx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.broadcast_tx.subscribe()
    }
}

/// Start a conversation runtime on the current tokio runtime
pub fn spawn_conversation<D>(dialogue: D) -> ConversationHandle
where
    D: DialogueService + 'static,
{
    let (event_tx, event_rx) = mpsc::channel(32);
    let (broadcast_tx, _) = broadcast::channel(128);
    let (transcript_tx, transcript_rx) = watch::channel(Transcript::new());
    let (busy_tx, busy_rx) = watch::channel(false);

    let runtime = ConversationRuntime::new(
        dialogue,
        event_rx,
        transcript_tx,
        busy_tx,
        broadcast_tx.clone(),
    );

    tokio::spawn(async move {
        runtime.run().await;
        tracing::info!("Conversation runtime finished");
    });

    ConversationHandle {
        event_tx,
        broadcast_tx,
        transcript_rx,
        busy_rx,
    }
}
