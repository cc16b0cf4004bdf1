//! Think tool — a scratchpad for intermediate reasoning.
//!
//! No side effects. The model writes its working notes here and gets them
//! echoed back as a tool result, which keeps them in the transcript for the
//! following rounds without surfacing them as an answer.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::base::{require_string, Tool};

pub struct ThinkTool;

#[async_trait]
impl Tool for ThinkTool {
    fn name(&self) -> &str {
        "think"
    }

    fn description(&self) -> &str {
        "Write out intermediate reasoning before acting. The thoughts are \
         private working notes, not shown to the user, and have no side \
         effects."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "thoughts": {
                    "type": "string",
                    "description": "The reasoning to record"
                }
            },
            "required": ["thoughts"]
        })
    }

    async fn invoke(&self, args: HashMap<String, Value>) -> anyhow::Result<String> {
        let thoughts = require_string(&args, "thoughts")?;
        debug!(chars = thoughts.len(), "thoughts recorded");
        Ok(format!("<thoughts>{thoughts}</thoughts>"))
    }
}
