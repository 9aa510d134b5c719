//! Pure state transition function

use super::{ConvState, Effect, Event, ReplyOutcome};
use crate::fallback::degraded_message;
use crate::format::format_reply;
use crate::transcript::{Transcript, Turn};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Reasons an event is not accepted in the current state
///
/// None of these reach the user as errors; the event is simply dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("A reply is still pending, cannot accept another message")]
    Busy,
    #[error("Message is empty")]
    EmptyUtterance,
    #[error("No dialogue request is in flight")]
    NoRequestInFlight,
}

/// Pure transition function
///
/// Given the same state, transcript and event this always produces the same
/// outcome and performs no I/O. The transcript is read to build request
/// context before the new user turn is appended.
pub fn transition(
    state: &ConvState,
    transcript: &Transcript,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Submissions
        // ============================================================
        (ConvState::Idle, Event::UserSubmit { text, .. }) if text.trim().is_empty() => {
            Err(TransitionError::EmptyUtterance)
        }

        (ConvState::Idle, Event::UserSubmit { text, turn_id }) => {
            let history = transcript.prior_turns();
            Ok(TransitionResult::new(ConvState::AwaitingReply)
                .with_effect(Effect::append(Turn::user(turn_id, text.clone())))
                .with_effect(Effect::busy(true))
                .with_effect(Effect::RequestReply {
                    utterance: text,
                    history,
                }))
        }

        (ConvState::AwaitingReply, Event::UserSubmit { .. }) => Err(TransitionError::Busy),

        // ============================================================
        // Replies
        // ============================================================
        (ConvState::AwaitingReply, Event::ReplyReceived { reply, turn_id }) => {
            Ok(TransitionResult::new(ConvState::Idle)
                .with_effect(Effect::busy(false))
                .with_effect(Effect::append(Turn::assistant(turn_id, format_reply(&reply))))
                .with_effect(Effect::NotifySettled {
                    outcome: ReplyOutcome::Rendered,
                }))
        }

        (ConvState::AwaitingReply, Event::ReplyFailed { turn_id, .. }) => {
            Ok(TransitionResult::new(ConvState::Idle)
                .with_effect(Effect::busy(false))
                .with_effect(Effect::append(Turn::assistant(turn_id, degraded_message())))
                .with_effect(Effect::NotifySettled {
                    outcome: ReplyOutcome::Degraded,
                }))
        }

        (ConvState::Idle, Event::ReplyReceived { .. } | Event::ReplyFailed { .. }) => {
            Err(TransitionError::NoRequestInFlight)
        }
    }
}
