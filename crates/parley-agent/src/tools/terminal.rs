//! Terminal tool — run a shell command and hand its output to the model.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use tokio::process::Command;
use tracing::{info, warn};

use super::base::{optional_string, require_string, Tool};

/// Maximum output length before truncation (characters).
const MAX_OUTPUT_LEN: usize = 10_000;

/// Command patterns that are always refused.
const DENY_PATTERNS: &[&str] = &[
    r"\brm\s+-[rf]{1,2}\b",
    r"\b(format|mkfs|diskpart)\b",
    r"\bdd\s+if=",
    r">\s*/dev/sd",
    r"\b(shutdown|reboot|poweroff)\b",
    r":\(\)\s*\{.*\};\s*:", // fork bomb
];

// ─────────────────────────────────────────────
// TerminalTool
// ─────────────────────────────────────────────

/// Executes shell commands in a subprocess with a bounded timeout.
pub struct TerminalTool {
    timeout: Duration,
    deny_regexes: Vec<Regex>,
}

impl TerminalTool {
    /// Create a terminal tool with the given command timeout.
    pub fn new(timeout_secs: u64) -> Self {
        let deny_regexes: Vec<Regex> = DENY_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();

        Self {
            timeout: Duration::from_secs(timeout_secs),
            deny_regexes,
        }
    }

    /// Returns a refusal message when the command matches a deny pattern.
    fn guard_command(&self, command: &str) -> Option<String> {
        let lower = command.to_lowercase();
        for re in &self.deny_regexes {
            if re.is_match(&lower) {
                warn!(command = command, "command blocked by safety guard");
                return Some(
                    "Error: command blocked by safety guard (dangerous pattern detected)".into(),
                );
            }
        }
        None
    }
}

#[async_trait]
impl Tool for TerminalTool {
    fn name(&self) -> &str {
        "terminal"
    }

    fn description(&self) -> &str {
        "Execute a shell command and return its combined output. \
         Use this for inspecting files, running programs, or any CLI task."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The shell command to execute"
                },
                "working_dir": {
                    "type": "string",
                    "description": "Optional working directory (defaults to the current one)"
                }
            },
            "required": ["command"]
        })
    }

    async fn invoke(&self, args: HashMap<String, Value>) -> anyhow::Result<String> {
        let command = require_string(&args, "command")?;
        let cwd = optional_string(&args, "working_dir");

        if let Some(refusal) = self.guard_command(&command) {
            // Tool-domain outcome, not an argument problem.
            return Ok(refusal);
        }

        info!(command = %command, "executing terminal command");

        let mut cmd = Command::new("sh");
        cmd.args(["-c", &command])
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped());
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let child = match cmd.spawn() {
            Ok(c) => c,
            Err(e) => return Ok(format!("Error: failed to spawn command: {e}")),
        };

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();
                let code = output.status.code().unwrap_or(-1);

                let mut parts = Vec::new();
                if !stdout.is_empty() {
                    parts.push(stdout);
                }
                if !stderr.is_empty() {
                    parts.push(format!("STDERR:\n{stderr}"));
                }
                if code != 0 {
                    parts.push(format!("Exit code: {code}"));
                }

                let mut combined = if parts.is_empty() {
                    "(no output)".to_string()
                } else {
                    parts.join("\n")
                };

                if combined.len() > MAX_OUTPUT_LEN {
                    let remaining = combined.len() - MAX_OUTPUT_LEN;
                    combined.truncate(MAX_OUTPUT_LEN);
                    combined.push_str(&format!("\n... (truncated, {remaining} more chars)"));
                }

                Ok(combined)
            }
            Ok(Err(e)) => Ok(format!("Error: command failed: {e}")),
            Err(_) => Ok(format!(
                "Error: command timed out after {} seconds",
                self.timeout.as_secs()
            )),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
