//! Dialogue client error types

use thiserror::Error;

/// Dialogue error with classification
///
/// The kind is kept for diagnostics only. Callers treat every error the
/// same way and fall back to the degraded message.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DialogueError {
    pub kind: DialogueErrorKind,
    pub message: String,
}

impl DialogueError {
    pub fn new(kind: DialogueErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(DialogueErrorKind::Network, message)
    }

    pub fn http_status(message: impl Into<String>) -> Self {
        Self::new(DialogueErrorKind::HttpStatus, message)
    }

    pub fn malformed_reply(message: impl Into<String>) -> Self {
        Self::new(DialogueErrorKind::MalformedReply, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(DialogueErrorKind::InvalidRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(DialogueErrorKind::Internal, message)
    }
}

/// Cause of a failed dialogue call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueErrorKind {
    /// Connection failures, timeouts, truncated bodies
    Network,
    /// Service answered with a non-2xx status
    HttpStatus,
    /// Body did not match the reply shape
    MalformedReply,
    /// Rejected before dispatch (e.g. blank utterance)
    InvalidRequest,
    /// Client construction failure or a panicked request task
    Internal,
}

impl DialogueErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::HttpStatus => "http_status",
            Self::MalformedReply => "malformed_reply",
            Self::InvalidRequest => "invalid_request",
            Self::Internal => "internal",
        }
    }
}
