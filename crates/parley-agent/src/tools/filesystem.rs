//! Filesystem tools — read and write files on behalf of the model.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::base::{require_string, Tool};

/// Expand `~` in a user-supplied path.
fn resolve_path(path: &str) -> PathBuf {
    parley_core::utils::expand_home(path)
}

// ─────────────────────────────────────────────
// ReadFileTool
// ─────────────────────────────────────────────

/// Reads and returns the entire content of a file.
pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a file at the given path. Returns the text with \
         each line prefixed by its line number."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Absolute or relative path to the file to read"
                }
            },
            "required": ["path"]
        })
    }

    async fn invoke(&self, args: HashMap<String, Value>) -> anyhow::Result<String> {
        let path = resolve_path(&require_string(&args, "path")?);

        if !path.exists() {
            return Ok(format!("Error: file not found: {}", path.display()));
        }
        if !path.is_file() {
            return Ok(format!("Error: not a file: {}", path.display()));
        }

        match std::fs::read_to_string(&path) {
            // Numbered lines so the model can reference locations precisely.
            Ok(content) => Ok(content
                .lines()
                .enumerate()
                .map(|(i, line)| format!("{}: {line}", i + 1))
                .collect::<Vec<_>>()
                .join("\n")),
            Err(e) => Ok(format!("Error: failed to read {}: {e}", path.display())),
        }
    }
}

// ─────────────────────────────────────────────
// WriteFileTool
// ─────────────────────────────────────────────

/// Writes content to a file, creating parent directories as needed.
pub struct WriteFileTool;

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write text content to a file at the given path, replacing any existing content."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path of the file to write"
                },
                "content": {
                    "type": "string",
                    "description": "Text content to write"
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn invoke(&self, args: HashMap<String, Value>) -> anyhow::Result<String> {
        let path = resolve_path(&require_string(&args, "path")?);
        let content = require_string(&args, "content")?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    return Ok(format!(
                        "Error: failed to create directory {}: {e}",
                        parent.display()
                    ));
                }
            }
        }

        match std::fs::write(&path, &content) {
            Ok(()) => Ok(format!(
                "Wrote {} bytes to {}",
                content.len(),
                path.display()
            )),
            Err(e) => Ok(format!("Error: failed to write {}: {e}", path.display())),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("note.txt");
        std::fs::write(&file, "file content here").unwrap();

        let mut args = HashMap::new();
        args.insert("path".into(), json!(file.to_str().unwrap()));
        let out = ReadFileTool.invoke(args).await.unwrap();
        assert_eq!(out, "1: file content here");
    }

    #[tokio::test]
    async fn read_numbers_every_line() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("multi.txt");
        std::fs::write(&file, "alpha\nbeta\ngamma\n").unwrap();

        let mut args = HashMap::new();
        args.insert("path".into(), json!(file.to_str().unwrap()));
        let out = ReadFileTool.invoke(args).await.unwrap();
        assert_eq!(out, "1: alpha\n2: beta\n3: gamma");
    }

    #[tokio::test]
    async fn read_missing_file_reports_as_text() {
        let mut args = HashMap::new();
        args.insert("path".into(), json!("/definitely/not/here.txt"));
        let out = ReadFileTool.invoke(args).await.unwrap();
        assert!(out.starts_with("Error: file not found"));
    }

    #[tokio::test]
    async fn read_missing_path_argument() {
        let err = ReadFileTool.invoke(HashMap::new()).await.unwrap_err();
        assert!(err.to_string().contains("path"));
    }

    #[tokio::test]
    async fn write_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a").join("b").join("out.txt");

        let mut args = HashMap::new();
        args.insert("path".into(), json!(file.to_str().unwrap()));
        args.insert("content".into(), json!("saved"));
        let out = WriteFileTool.invoke(args).await.unwrap();

        assert!(out.starts_with("Wrote 5 bytes"));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "saved");
    }

    #[tokio::test]
    async fn write_requires_content() {
        let mut args = HashMap::new();
        args.insert("path".into(), json!("/tmp/x.txt"));
        let err = WriteFileTool.invoke(args).await.unwrap_err();
        assert!(err.to_string().contains("content"));
    }
}
