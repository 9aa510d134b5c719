//! Conversation runtime executor

use super::ConversationEvent;
use crate::dialogue::{DialogueErrorKind, DialogueService};
use crate::state_machine::{transition, ConvState, Effect, Event, TransitionError};
use crate::transcript::{HistoryEntry, Transcript};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

/// Generic conversation runtime that can work with any dialogue implementation
pub struct ConversationRuntime<D>
where
    D: DialogueService + 'static,
{
    state: ConvState,
    dialogue: Arc<D>,
    event_rx: mpsc::Receiver<Event>,
    /// Reply events from request tasks; open for as long as the runtime lives
    reply_tx: mpsc::Sender<Event>,
    reply_rx: mpsc::Receiver<Event>,
    transcript_tx: watch::Sender<Transcript>,
    busy_tx: watch::Sender<bool>,
    broadcast_tx: broadcast::Sender<ConversationEvent>,
}

impl<D> ConversationRuntime<D>
where
    D: DialogueService + 'static,
{
    pub fn new(
        dialogue: D,
        event_rx: mpsc::Receiver<Event>,
        transcript_tx: watch::Sender<Transcript>,
        busy_tx: watch::Sender<bool>,
        broadcast_tx: broadcast::Sender<ConversationEvent>,
    ) -> Self {
        let (reply_tx, reply_rx) = mpsc::channel(1);
        Self {
            state: ConvState::Idle,
            dialogue: Arc::new(dialogue),
            event_rx,
            reply_tx,
            reply_rx,
            transcript_tx,
            busy_tx,
            broadcast_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(endpoint = %self.dialogue.endpoint(), "Starting conversation runtime");

        let mut handles_open = true;
        loop {
            // Once every handle is gone, stay up only to settle a pending reply
            if !handles_open && !self.state.is_busy() {
                break;
            }

            let event = tokio::select! {
                Some(event) = self.reply_rx.recv() => event,
                event = self.event_rx.recv(), if handles_open => match event {
                    Some(event) => event,
                    None => {
                        tracing::debug!(busy = self.state.is_busy(), "All handles dropped");
                        handles_open = false;
                        continue;
                    }
                },
            };

            let event_name = event.name();
            match self.process_event(event) {
                Ok(()) => {}
                Err(e @ (TransitionError::Busy | TransitionError::EmptyUtterance)) => {
                    tracing::debug!(error = %e, event = event_name, "Submission ignored");
                    let _ = self.broadcast_tx.send(ConversationEvent::Rejected {
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, event = event_name, "Dropping unexpected event");
                }
            }
        }

        tracing::info!("Conversation runtime stopped");
    }

    fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        // Pure state transition; the borrow must end before effects write
        let result = {
            let transcript = self.transcript_tx.borrow();
            transition(&self.state, &transcript, event)?
        };

        tracing::debug!(from = ?self.state, to = ?result.new_state, "State transition");
        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect);
        }

        Ok(())
    }

    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::AppendTurn { turn } => {
                let appended = self
                    .transcript_tx
                    .send_if_modified(|transcript| transcript.append(turn.clone()));
                if appended {
                    let _ = self
                        .broadcast_tx
                        .send(ConversationEvent::TurnAppended { turn });
                }
            }

            Effect::SetBusy { busy } => {
                self.busy_tx.send_replace(busy);
                let _ = self
                    .broadcast_tx
                    .send(ConversationEvent::BusyChanged { busy });
            }

            Effect::RequestReply { utterance, history } => {
                self.request_reply(utterance, history);
            }

            Effect::NotifySettled { outcome } => {
                let _ = self
                    .broadcast_tx
                    .send(ConversationEvent::ReplySettled { outcome });
            }
        }
    }

    /// Spawn the dialogue round trip; its result comes back as an event
    fn request_reply(&self, utterance: String, history: Vec<HistoryEntry>) {
        let reply_tx = self.reply_tx.clone();
        let dialogue = Arc::clone(&self.dialogue);

        tokio::spawn(async move {
            tracing::info!(history_len = history.len(), "Making dialogue request (background)");

            // Own task so a panicking client still yields a reply event
            let request = tokio::spawn(async move { dialogue.send(&utterance, &history).await });

            let event = match request.await {
                Ok(Ok(reply)) => Event::reply_received(reply),
                Ok(Err(e)) => {
                    tracing::warn!(
                        error_kind = e.kind.as_str(),
                        error = %e.message,
                        "Dialogue request failed, using fallback"
                    );
                    Event::reply_failed(e.kind)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Dialogue request task failed");
                    Event::reply_failed(DialogueErrorKind::Internal)
                }
            };

            if reply_tx.send(event).await.is_err() {
                tracing::debug!("Runtime gone before reply arrived");
            }
        });
    }
}
