//! Application-level configuration.
//!
//! - [`TurnPolicy`]: limits on one conversation turn (wall clock, tool
//!   rounds, event buffering)

pub mod turn_policy;

pub use turn_policy::TurnPolicy;
