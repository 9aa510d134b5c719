//! Events that can occur in a conversation

use crate::dialogue::{DialogueErrorKind, StructuredReply};
use crate::transcript::TurnId;

/// Events that trigger state transitions
///
/// Turn ids are minted by whoever raises the event so the transition
/// function stays deterministic.
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserSubmit {
        text: String,
        turn_id: TurnId,
    },

    // Dialogue events
    ReplyReceived {
        reply: StructuredReply,
        turn_id: TurnId,
    },
    ReplyFailed {
        /// Diagnostics only; every failure renders the same way
        kind: DialogueErrorKind,
        turn_id: TurnId,
    },
}

impl Event {
    pub fn user_submit(text: impl Into<String>) -> Self {
        Event::UserSubmit {
            text: text.into(),
            turn_id: TurnId::new(),
        }
    }

    pub fn reply_received(reply: StructuredReply) -> Self {
        Event::ReplyReceived {
            reply,
            turn_id: TurnId::new(),
        }
    }

    pub fn reply_failed(kind: DialogueErrorKind) -> Self {
        Event::ReplyFailed {
            kind,
            turn_id: TurnId::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Event::UserSubmit { .. } => "user_submit",
            Event::ReplyReceived { .. } => "reply_received",
            Event::ReplyFailed { .. } => "reply_failed",
        }
    }
}
