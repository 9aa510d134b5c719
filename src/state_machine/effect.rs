//! Effects produced by state transitions

use crate::transcript::{HistoryEntry, Turn};

/// How a submission was answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The service replied and the reply was formatted
    Rendered,
    /// The call failed and the fallback text was used
    Degraded,
}

/// Effects to be executed after state transition, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a finalized turn to the transcript
    AppendTurn { turn: Turn },

    /// Publish the busy indicator
    SetBusy { busy: bool },

    /// Dispatch a dialogue request (spawns as background task)
    RequestReply {
        utterance: String,
        history: Vec<HistoryEntry>,
    },

    /// Tell observers how the last submission settled
    NotifySettled { outcome: ReplyOutcome },
}

impl Effect {
    pub fn append(turn: Turn) -> Self {
        Effect::AppendTurn { turn }
    }

    pub fn busy(busy: bool) -> Self {
        Effect::SetBusy { busy }
    }
}
