//! Tool trait — the interface every local capability implements.
//!
//! Error contract, applied consistently across all tools: `Err` out of
//! [`Tool::invoke`] means the arguments did not match the tool's schema and
//! becomes a dispatch failure. Anything that goes wrong *inside* the tool's
//! own domain (command failed, file missing) is reported as `Ok` text, so
//! the model can read it and react.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use parley_core::types::ToolDefinition;

// ─────────────────────────────────────────────
// Tool trait
// ─────────────────────────────────────────────

/// A named local capability the model may invoke.
///
/// The catalog discovers tools via `name()`, advertises their schemas via
/// `to_definition()`, and the dispatcher invokes them via `invoke()`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the model uses to call this tool (e.g. `"terminal"`).
    fn name(&self) -> &str;

    /// Human-readable description shown to the model.
    fn description(&self) -> &str;

    /// JSON Schema describing the parameters.
    ///
    /// Must be `{"type": "object", "properties": {...}, "required": [...]}`.
    fn parameters(&self) -> Value;

    /// Invoke the tool with named arguments.
    ///
    /// Returns the textual output sent back to the model. `Err` is reserved
    /// for argument-shape violations (see module docs).
    async fn invoke(&self, args: HashMap<String, Value>) -> anyhow::Result<String>;

    /// Build the definition advertised to the model.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.parameters())
    }
}

// ─────────────────────────────────────────────
// Argument helpers
// ─────────────────────────────────────────────

/// Extract a required `String` argument.
pub fn require_string(args: &HashMap<String, Value>, key: &str) -> anyhow::Result<String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("missing or non-string argument: {key}"))
}

/// Extract an optional `String` argument.
pub fn optional_string(args: &HashMap<String, Value>, key: &str) -> Option<String> {
    args.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}
