//! Sitecore Personalize adapter
//!
//! Remote operations for the `PersonalizeCDP` product and the built-in tool
//! catalogue that binds them to argument schemas.
//!
//! Every operation authenticates with the request's own
//! [`ClientConfiguration`](assistant_domain::ClientConfiguration) and turns
//! transport or HTTP failures into
//! [`RemoteResult`](assistant_application::RemoteResult) values.

pub mod catalogue;
pub mod client;
pub mod operations;

pub use catalogue::{CREATE_EXPERIENCE, LIST_EXPERIENCES, builtin_registry};
pub use client::{PersonalizeClient, PersonalizeError};
pub use operations::{CreateExperienceOperation, ListExperiencesOperation};
