//! Tool Registry
//!
//! The [`ToolRegistry`] maps a tool name to its [`ToolDeclaration`] and the
//! [`ToolExecutor`] that performs it. It is built once at start-up, wrapped
//! in an `Arc`, and only read afterwards.
//!
//! # Usage
//!
//! ```ignore
//! let registry = ToolRegistry::new()
//!     .register(create_declaration, Arc::new(CreateExperienceOperation::new(client)))
//!     .register(list_declaration, Arc::new(ListExperiencesOperation::new(client)));
//!
//! // Per request: only tools whose product has credentials
//! let declared = registry.declarations_for(&configurations.products());
//! let entry = declared.resolve("create_personalization_experience")?;
//! ```
//!
//! # Product filtering
//!
//! [`declarations_for`](ToolRegistry::declarations_for) returns a
//! [`DeclaredTools`] view. The model only ever sees that view, and the
//! orchestrator resolves calls against it, so a tool for a product without
//! credentials is reported as not found even though it is registered.

use crate::ports::tool_executor::{RemoteResult, ToolExecutor};
use assistant_domain::{
    ClientConfiguration, PlatformProduct, ToolDeclaration, ValidatedArguments,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use thiserror::Error;

/// Lookup miss for a tool name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Tool not found: {name}")]
pub struct ToolNotFound {
    pub name: String,
}

/// A registered tool: its declaration plus its executor
pub struct ToolEntry {
    declaration: ToolDeclaration,
    executor: Arc<dyn ToolExecutor>,
}

impl ToolEntry {
    pub fn declaration(&self) -> &ToolDeclaration {
        &self.declaration
    }

    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    pub fn bound_product(&self) -> PlatformProduct {
        self.declaration.bound_product
    }

    /// Perform the remote operation once.
    pub async fn invoke(
        &self,
        arguments: &ValidatedArguments,
        configuration: &ClientConfiguration,
    ) -> RemoteResult {
        self.executor.invoke(arguments, configuration).await
    }
}

impl std::fmt::Debug for ToolEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolEntry")
            .field("name", &self.declaration.name)
            .field("bound_product", &self.declaration.bound_product)
            .finish()
    }
}

/// All tools known to the process
#[derive(Default)]
pub struct ToolRegistry {
    entries: BTreeMap<String, Arc<ToolEntry>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. A second registration under the same name replaces
    /// the first.
    pub fn register(mut self, declaration: ToolDeclaration, executor: Arc<dyn ToolExecutor>) -> Self {
        let name = declaration.name.clone();
        let entry = Arc::new(ToolEntry {
            declaration,
            executor,
        });
        if self.entries.insert(name.clone(), entry).is_some() {
            tracing::warn!(tool = %name, "Tool registered twice, keeping the later one");
        } else {
            tracing::debug!(tool = %name, "Registered tool");
        }
        self
    }

    pub fn resolve(&self, name: &str) -> Result<&Arc<ToolEntry>, ToolNotFound> {
        self.entries.get(name).ok_or_else(|| ToolNotFound {
            name: name.to_string(),
        })
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered tool names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The tools to declare for a request holding credentials for
    /// `configured`. The registry itself is left untouched.
    pub fn declarations_for(&self, configured: &BTreeSet<PlatformProduct>) -> DeclaredTools {
        let entries = self
            .entries
            .values()
            .filter(|entry| configured.contains(&entry.bound_product()))
            .cloned()
            .collect();
        DeclaredTools { entries }
    }
}

/// Tools declared to the model for one request, sorted by name
#[derive(Debug, Clone, Default)]
pub struct DeclaredTools {
    entries: Vec<Arc<ToolEntry>>,
}

impl DeclaredTools {
    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.entries
            .iter()
            .map(|entry| entry.declaration.clone())
            .collect()
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<ToolEntry>, ToolNotFound> {
        self.entries
            .iter()
            .find(|entry| entry.name() == name)
            .cloned()
            .ok_or_else(|| ToolNotFound {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
