//! Configuration schema.
//!
//! Hierarchy: `Config` → `AgentConfig`, `ApiConfig`, `AudioConfig`,
//! `ToolsConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case, bridged via
//! `#[serde(rename_all = "camelCase")]`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─────────────────────────────────────────────
// Root config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.parley/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub agent: AgentConfig,
    pub api: ApiConfig,
    pub audio: AudioConfig,
    pub tools: ToolsConfig,
}

// ─────────────────────────────────────────────
// Agent
// ─────────────────────────────────────────────

/// Conversation engine settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    /// Model identifier for text conversations.
    pub model: String,
    /// Token budget per completion.
    pub max_completion_tokens: u32,
    /// Maximum tool-call recursion rounds per submit before the engine
    /// returns the last assistant text without dispatching.
    pub max_tool_recursions: u32,
    /// Delay before the single transport retry, in milliseconds.
    pub retry_delay_ms: u64,
    /// System prompt seeded into every transcript.
    pub system_prompt: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "o3-mini".to_string(),
            max_completion_tokens: 8096,
            max_tool_recursions: 20,
            retry_delay_ms: 1000,
            system_prompt: "You are a helpful assistant running in a terminal. \
                            Keep answers concise."
                .to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// API endpoint
// ─────────────────────────────────────────────

/// Remote chat-completion endpoint settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiConfig {
    /// Bearer token for authentication.
    #[serde(default)]
    pub api_key: String,
    /// API base URL; `/chat/completions` is appended.
    pub api_base: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Extra HTTP headers to send with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<HashMap<String, String>>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://api.openai.com/v1".to_string(),
            timeout_secs: 120,
            extra_headers: None,
        }
    }
}

impl ApiConfig {
    /// Whether an API key has been set.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ─────────────────────────────────────────────
// Audio
// ─────────────────────────────────────────────

/// Audio modality settings. Used once a conversation switches to audio.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudioConfig {
    /// Whether audio playback is enabled at all.
    pub enabled: bool,
    /// Audio-capable model to switch to.
    pub model: String,
    /// Voice preset.
    pub voice: String,
    /// Output container format.
    pub format: String,
    /// Player binary invoked for playback (fire-and-forget).
    pub player: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "gpt-4o-audio-preview".to_string(),
            voice: "alloy".to_string(),
            format: "wav".to_string(),
            player: "aplay".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Tools
// ─────────────────────────────────────────────

/// Built-in tool settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolsConfig {
    /// Whether the tool catalog is attached to requests at all.
    pub enabled: bool,
    /// Timeout for the terminal tool, in seconds.
    pub terminal_timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            terminal_timeout_secs: 60,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
