//! Tool domain module
//!
//! Tools are the structured operations the language model may request instead
//! of answering in plain text. Each tool is described by a
//! [`ToolDeclaration`] (name, description, argument schema, bound product),
//! requested through a [`ToolCall`], and answered with a
//! [`ToolInvocationResult`].
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────┐    ┌──────────────────────┐
//! │ ToolDeclaration │───▶│ ToolCall     │───▶│ ToolInvocationResult │
//! │ (registry)      │    │ (model)      │    │ (fed back as `tool`) │
//! └────────┬────────┘    └──────┬───────┘    └──────────────────────┘
//!          │                    │
//!          └── ArgumentSchema ──┴── ToolValidator::validate()
//! ```
//!
//! # Validation before dispatch
//!
//! Arguments are checked against the declared [`ArgumentSchema`] before any
//! side effect happens. A failure becomes an `INVALID_ARGUMENT` result that
//! the model reads and corrects on its next round, so malformed arguments
//! never consume a remote operation.
//!
//! # Architecture
//!
//! - **Domain** (this module): declarations, schemas, validation, results
//! - **Application** (`ToolRegistry`, `ToolExecutor`): registration, product
//!   filtering, dispatch
//! - **Infrastructure**: concrete remote operations

pub mod entities;
pub mod schema;
pub mod traits;
pub mod validation;
pub mod value_objects;

pub use entities::{ToolCall, ToolCapability, ToolDeclaration};
pub use schema::{ArgumentSchema, Property, SchemaKind};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use validation::{ValidatedArguments, ValidationError, validate};
pub use value_objects::{InvocationStatus, ToolError, ToolInvocationResult};
