//! Tool Catalog and Dispatcher.
//!
//! The catalog is an explicit table from tool name to capability, built at
//! startup — never runtime attribute lookup. An entry is either `Callable`
//! (schema + implementation) or `Declared` (schema only), which lets
//! [`ToolCatalog::validate`] report schemas with no matching implementation
//! before the first conversation starts.
//!
//! Dispatch failures are typed and **propagate**: a failed resolution or an
//! argument-shape mismatch indicates a schema/catalog bug worth surfacing,
//! unlike business-logic failures which tools report as output text.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use parley_core::types::ToolDefinition;

use crate::tools::Tool;

// ─────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────

/// A tool call could not be dispatched.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The requested name is not in the catalog at all.
    #[error("unknown tool: '{0}'")]
    UnknownTool(String),

    /// The name is declared in the catalog but carries no implementation.
    #[error("tool '{0}' is declared but not invocable")]
    NotInvocable(String),

    /// The serialized argument blob was not a JSON object, or the tool
    /// rejected the argument shape.
    #[error("arguments for tool '{name}' do not match its schema: {reason}")]
    ArgumentMismatch { name: String, reason: String },
}

// ─────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────

/// One catalog entry: an invocable tool, or a declared-only schema.
pub enum CatalogEntry {
    Callable(Arc<dyn Tool>),
    Declared(ToolDefinition),
}

impl CatalogEntry {
    fn definition(&self) -> ToolDefinition {
        match self {
            CatalogEntry::Callable(tool) => tool.to_definition(),
            CatalogEntry::Declared(def) => def.clone(),
        }
    }
}

/// Maps tool names to capabilities and performs dispatch.
///
/// Entries keep registration order for schema listing; lookup is by name.
pub struct ToolCatalog {
    entries: HashMap<String, CatalogEntry>,
    order: Vec<String>,
}

impl ToolCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register an invocable tool. Overwrites any previous entry with the
    /// same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        info!(tool = %name, "registered tool");
        if self.entries.insert(name.clone(), CatalogEntry::Callable(tool)).is_none() {
            self.order.push(name);
        }
    }

    /// Register a schema without an implementation. Used for capabilities
    /// advertised ahead of their implementation; dispatching one fails with
    /// [`DispatchError::NotInvocable`].
    pub fn declare(&mut self, definition: ToolDefinition) {
        let name = definition.function.name.clone();
        if self
            .entries
            .insert(name.clone(), CatalogEntry::Declared(definition))
            .is_none()
        {
            self.order.push(name);
        }
    }

    /// Whether a name is present (callable or declared).
    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Schema list for request construction, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.entries.get(name))
            .map(CatalogEntry::definition)
            .collect()
    }

    /// Names of declared-only entries. Non-empty means the catalog
    /// advertises capabilities it cannot dispatch.
    pub fn validate(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|name| {
                matches!(self.entries.get(*name), Some(CatalogEntry::Declared(_)))
            })
            .cloned()
            .collect()
    }

    /// Resolve and invoke a tool by name.
    ///
    /// `arguments` is the serialized JSON blob from the model's tool call;
    /// it must decode to an object. The result is always text — tools
    /// convert their own output before returning.
    pub async fn dispatch(&self, name: &str, arguments: &str) -> Result<String, DispatchError> {
        let tool = match self.entries.get(name) {
            None => {
                warn!(tool = name, "unknown tool requested");
                return Err(DispatchError::UnknownTool(name.to_string()));
            }
            Some(CatalogEntry::Declared(_)) => {
                warn!(tool = name, "declared-only tool requested");
                return Err(DispatchError::NotInvocable(name.to_string()));
            }
            Some(CatalogEntry::Callable(tool)) => tool,
        };

        let args: HashMap<String, Value> =
            serde_json::from_str(arguments).map_err(|e| DispatchError::ArgumentMismatch {
                name: name.to_string(),
                reason: format!("argument blob is not a JSON object: {e}"),
            })?;

        debug!(tool = name, args = arguments, "dispatching tool call");

        tool.invoke(args)
            .await
            .map_err(|e| DispatchError::ArgumentMismatch {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
