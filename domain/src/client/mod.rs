//! Tenant credentials supplied per request.
//!
//! A [`ClientConfiguration`] binds one set of credentials to one
//! [`PlatformProduct`](crate::core::product::PlatformProduct). Secrets stay
//! inside this module's types: `Debug` redacts them, serialization omits them,
//! and [`ClientConfigurations::redact`] scrubs them from free text before that
//! text can reach the conversation or the output stream.

pub mod entities;

pub use entities::{ClientConfiguration, ClientConfigurations, REDACTED};
