//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: language models the assistant can talk to
//! - [`product::PlatformProduct`]: products of the asset-management platform
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod product;
