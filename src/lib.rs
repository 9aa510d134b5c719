//! LOGEAUM conversation client
//!
//! Client-side orchestrator for a supportive chat: keeps the transcript,
//! drives the request/response cycle with the remote dialogue service and
//! renders replies according to the detected severity.

pub mod config;
pub mod dialogue;
pub mod fallback;
pub mod format;
pub mod runtime;
pub mod state_machine;
pub mod transcript;

pub use config::{ClientConfig, ConfigError};
pub use dialogue::{
    DialogueError, DialogueErrorKind, DialogueService, HttpDialogueClient, LoggingService,
    Resource, Severity, StructuredReply,
};
pub use runtime::{spawn_conversation, ConversationEvent, ConversationHandle, RuntimeError};
pub use state_machine::ReplyOutcome;
pub use transcript::{Role, Transcript, Turn, TurnId};
