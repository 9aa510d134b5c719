//! Conversation state types

use serde::Serialize;

/// Where the conversation is in its turn cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConvState {
    /// Ready to accept a submission
    #[default]
    Idle,
    /// A dialogue request is in flight; submissions are rejected
    AwaitingReply,
}

impl ConvState {
    /// Whether the busy indicator should be shown
    pub fn is_busy(self) -> bool {
        matches!(self, ConvState::AwaitingReply)
    }
}
