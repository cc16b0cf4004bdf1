//! Config loader — reads `~/.parley/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.parley/config.json`
//! 3. Environment variables `PARLEY_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be
/// parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    load_config_from_path(&config_path)
}

fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `PARLEY_<SECTION>__<FIELD>` (double underscore as
/// delimiter).
///
/// Supported overrides:
/// - `PARLEY_AGENT__MODEL` → `agent.model`
/// - `PARLEY_AGENT__MAX_COMPLETION_TOKENS` → `agent.max_completion_tokens`
/// - `PARLEY_AGENT__MAX_TOOL_RECURSIONS` → `agent.max_tool_recursions`
/// - `PARLEY_AGENT__SYSTEM_PROMPT` → `agent.system_prompt`
/// - `PARLEY_API__KEY` → `api.api_key`
/// - `PARLEY_API__BASE` → `api.api_base`
/// - `PARLEY_API__TIMEOUT_SECS` → `api.timeout_secs`
/// - `PARLEY_AUDIO__ENABLED` → `audio.enabled`
/// - `PARLEY_AUDIO__PLAYER` → `audio.player`
/// - `PARLEY_TOOLS__ENABLED` → `tools.enabled`
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("PARLEY_AGENT__MODEL") {
        config.agent.model = val;
    }
    if let Ok(val) = std::env::var("PARLEY_AGENT__MAX_COMPLETION_TOKENS") {
        if let Ok(n) = val.parse::<u32>() {
            config.agent.max_completion_tokens = n;
        }
    }
    if let Ok(val) = std::env::var("PARLEY_AGENT__MAX_TOOL_RECURSIONS") {
        if let Ok(n) = val.parse::<u32>() {
            config.agent.max_tool_recursions = n;
        }
    }
    if let Ok(val) = std::env::var("PARLEY_AGENT__SYSTEM_PROMPT") {
        config.agent.system_prompt = val;
    }

    if let Ok(val) = std::env::var("PARLEY_API__KEY") {
        config.api.api_key = val;
    }
    if let Ok(val) = std::env::var("PARLEY_API__BASE") {
        config.api.api_base = val;
    }
    if let Ok(val) = std::env::var("PARLEY_API__TIMEOUT_SECS") {
        if let Ok(n) = val.parse::<u64>() {
            config.api.timeout_secs = n;
        }
    }

    if let Ok(val) = std::env::var("PARLEY_AUDIO__ENABLED") {
        config.audio.enabled = val == "true" || val == "1";
    }
    if let Ok(val) = std::env::var("PARLEY_AUDIO__PLAYER") {
        config.audio.player = val;
    }

    if let Ok(val) = std::env::var("PARLEY_TOOLS__ENABLED") {
        config.tools.enabled = val == "true" || val == "1";
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
