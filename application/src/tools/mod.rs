//! Tool registration and per-request tool sets.

pub mod registry;

pub use registry::{DeclaredTools, ToolEntry, ToolNotFound, ToolRegistry};
