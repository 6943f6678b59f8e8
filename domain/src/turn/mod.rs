//! One conversation turn: its lifecycle and the events it emits.

pub mod event;
pub mod state;

pub use event::{ErrorKind, StreamEvent};
pub use state::TurnState;
