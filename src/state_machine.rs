//! Conversation turn-cycle state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.
//! The runtime executes the returned effects.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::{Effect, ReplyOutcome};
pub use event::Event;
pub use state::ConvState;
pub use transition::{transition, TransitionError, TransitionResult};
