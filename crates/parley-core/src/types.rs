//! Wire types for the OpenAI chat completions format.
//!
//! Messages are modelled as a role-tagged enum so that format errors are
//! caught at compile time instead of at the API boundary. The same types are
//! used for the transcript, for request bodies, and (via the `Chat*` structs
//! at the bottom) for deserializing endpoint responses.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Roles
// ─────────────────────────────────────────────

/// The four chat roles. Ordering rules between them are enforced by
/// [`crate::transcript::Transcript`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        };
        f.write_str(s)
    }
}

// ─────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────

/// A chat message in the OpenAI format. Each variant maps to a `role` value.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role")]
pub enum Message {
    #[serde(rename = "system")]
    System { content: String },

    #[serde(rename = "user")]
    User { content: MessageContent },

    #[serde(rename = "assistant")]
    Assistant {
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        tool_calls: Option<Vec<ToolCall>>,
        /// Synthesized speech returned by audio-capable models.
        #[serde(skip_serializing_if = "Option::is_none")]
        audio: Option<AudioPayload>,
    },

    #[serde(rename = "tool")]
    Tool {
        content: String,
        tool_call_id: String,
    },
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    /// Create a user message with text content.
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a user message with multipart content (text + image/audio).
    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Message::User {
            content: MessageContent::Parts(parts),
        }
    }

    /// Create an assistant message with text content.
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant {
            content: Some(content.into()),
            tool_calls: None,
            audio: None,
        }
    }

    /// Create an assistant message with tool calls (no text content).
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Message::Assistant {
            content: None,
            tool_calls: Some(tool_calls),
            audio: None,
        }
    }

    /// Create a tool result message.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Message::Tool {
            content: content.into(),
            tool_call_id: tool_call_id.into(),
        }
    }

    /// The role of this message.
    pub fn role(&self) -> Role {
        match self {
            Message::System { .. } => Role::System,
            Message::User { .. } => Role::User,
            Message::Assistant { .. } => Role::Assistant,
            Message::Tool { .. } => Role::Tool,
        }
    }

    /// Tool calls carried by this message, if it is an assistant message
    /// that requested any. An empty array counts as none.
    pub fn tool_calls(&self) -> Option<&[ToolCall]> {
        match self {
            Message::Assistant {
                tool_calls: Some(calls),
                ..
            } if !calls.is_empty() => Some(calls),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────
// Message content (text or multipart)
// ─────────────────────────────────────────────

/// User message content — plain text, or multipart for image/audio input.
///
/// When serialized: text becomes a plain string, parts become an array.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple text content (most common case).
    Text(String),
    /// Multipart content with text and/or media parts.
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Whether any part of this content is audio input.
    pub fn has_audio(&self) -> bool {
        match self {
            MessageContent::Text(_) => false,
            MessageContent::Parts(parts) => parts
                .iter()
                .any(|p| matches!(p, ContentPart::InputAudio { .. })),
        }
    }
}

/// A single part of a multipart user message.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ContentPart {
    /// Text part.
    #[serde(rename = "text")]
    Text { text: String },
    /// Image part (URL or base64 data URI).
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
    /// Recorded audio input (base64 wav).
    #[serde(rename = "input_audio")]
    InputAudio { input_audio: InputAudio },
}

/// Image URL payload.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ImageUrl {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Audio input payload: base64-encoded bytes plus their container format.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InputAudio {
    pub data: String,
    pub format: String,
}

/// Audio returned by the model on an assistant message.
///
/// `data` is base64 wav when present; responses that reference previously
/// generated audio carry only `id`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AudioPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

// ─────────────────────────────────────────────
// Tool calls
// ─────────────────────────────────────────────

/// A tool call from the assistant, requesting execution of a function.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// Unique ID for this call (used to correlate the result).
    pub id: String,
    /// Always "function" in the current API.
    #[serde(rename = "type")]
    pub call_type: String,
    /// The function to call.
    pub function: FunctionCall,
}

impl ToolCall {
    /// Create a new tool call.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        ToolCall {
            id: id.into(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

/// The function name and serialized argument blob within a tool call.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments string.
    pub arguments: String,
}

// ─────────────────────────────────────────────
// Tool definitions (for requests)
// ─────────────────────────────────────────────

/// Definition of a tool, sent to the model so it knows what it may call.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// Always "function".
    #[serde(rename = "type")]
    pub tool_type: String,
    /// The function schema.
    pub function: FunctionDefinition,
}

/// Schema of a function tool.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        ToolDefinition {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

// ─────────────────────────────────────────────
// Chat completion request
// ─────────────────────────────────────────────

/// Audio generation parameters (only set when the conversation has
/// switched to audio modality).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AudioParams {
    pub voice: String,
    pub format: String,
}

/// Request body for an OpenAI-compatible chat completion API.
#[derive(Clone, Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modalities: Option<Vec<String>>,
}

// ─────────────────────────────────────────────
// Chat completion response
// ─────────────────────────────────────────────

/// Raw chat completion response from an OpenAI-compatible API.
#[derive(Clone, Debug, Deserialize)]
pub struct ChatResponse {
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub usage: Option<UsageInfo>,
}

/// A single choice in a chat completion response.
#[derive(Clone, Debug, Deserialize)]
pub struct ChatChoice {
    pub message: WireAssistantMessage,
    pub finish_reason: Option<String>,
}

/// The assistant message body within a chat completion choice.
#[derive(Clone, Debug, Deserialize)]
pub struct WireAssistantMessage {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default)]
    pub audio: Option<AudioPayload>,
}

impl ChatResponse {
    /// The first candidate's message body, if the response carries one.
    /// A response without one is unusable.
    pub fn message(&self) -> Option<&WireAssistantMessage> {
        self.choices.first().map(|c| &c.message)
    }

    /// Consume the response, taking the first candidate's message body.
    pub fn into_message(self) -> Option<WireAssistantMessage> {
        self.choices.into_iter().next().map(|c| c.message)
    }
}

impl From<WireAssistantMessage> for Message {
    /// Lift a wire message into a transcript entry, verbatim: text, tool
    /// calls, and audio payload all carry over.
    fn from(m: WireAssistantMessage) -> Self {
        Message::Assistant {
            content: m.content,
            tool_calls: m.tool_calls.filter(|c| !c.is_empty()),
            audio: m.audio,
        }
    }
}

/// Token usage statistics from the endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UsageInfo {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn system_message_serialization() {
        let msg = Message::system("You are a helpful assistant.");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "You are a helpful assistant.");
    }

    #[test]
    fn user_text_message_serialization() {
        let msg = Message::user("Hello, world!");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "Hello, world!");
    }

    #[test]
    fn user_multipart_serialization() {
        let msg = Message::user_parts(vec![
            ContentPart::Text {
                text: "What's in this image?".to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: "data:image/jpeg;base64,abc123".to_string(),
                    detail: None,
                },
            },
            ContentPart::InputAudio {
                input_audio: InputAudio {
                    data: "UklGRg==".to_string(),
                    format: "wav".to_string(),
                },
            },
        ]);
        let json = serde_json::to_value(&msg).unwrap();

        let content = json["content"].as_array().unwrap();
        assert_eq!(content.len(), 3);
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(
            content[1]["image_url"]["url"],
            "data:image/jpeg;base64,abc123"
        );
        assert_eq!(content[2]["type"], "input_audio");
        assert_eq!(content[2]["input_audio"]["format"], "wav");
    }

    #[test]
    fn content_audio_detection() {
        let text = MessageContent::Text("hi".into());
        assert!(!text.has_audio());

        let parts = MessageContent::Parts(vec![
            ContentPart::Text { text: "hi".into() },
            ContentPart::InputAudio {
                input_audio: InputAudio {
                    data: "AAAA".into(),
                    format: "wav".into(),
                },
            },
        ]);
        assert!(parts.has_audio());

        let image_only = MessageContent::Parts(vec![ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: "https://example.com/x.png".into(),
                detail: None,
            },
        }]);
        assert!(!image_only.has_audio());
    }

    #[test]
    fn assistant_tool_calls_serialization() {
        let msg = Message::assistant_tool_calls(vec![ToolCall::new(
            "call_123",
            "terminal",
            r#"{"command": "ls"}"#,
        )]);
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "assistant");
        assert!(json.get("content").is_none());
        assert!(json.get("audio").is_none());

        let calls = json["tool_calls"].as_array().unwrap();
        assert_eq!(calls[0]["id"], "call_123");
        assert_eq!(calls[0]["type"], "function");
        assert_eq!(calls[0]["function"]["name"], "terminal");
    }

    #[test]
    fn tool_result_serialization() {
        let msg = Message::tool_result("call_123", "total 0");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "tool");
        assert_eq!(json["content"], "total 0");
        assert_eq!(json["tool_call_id"], "call_123");
    }

    #[test]
    fn message_roles() {
        assert_eq!(Message::system("s").role(), Role::System);
        assert_eq!(Message::user("u").role(), Role::User);
        assert_eq!(Message::assistant("a").role(), Role::Assistant);
        assert_eq!(Message::tool_result("id", "t").role(), Role::Tool);
    }

    #[test]
    fn tool_calls_accessor() {
        let plain = Message::assistant("done");
        assert!(plain.tool_calls().is_none());

        let with_calls =
            Message::assistant_tool_calls(vec![ToolCall::new("c1", "terminal", "{}")]);
        assert_eq!(with_calls.tool_calls().unwrap().len(), 1);

        // An empty tool_calls array counts as "no tool calls".
        let empty = Message::Assistant {
            content: Some("hi".into()),
            tool_calls: Some(vec![]),
            audio: None,
        };
        assert!(empty.tool_calls().is_none());
    }

    #[test]
    fn chat_request_serialization() {
        let request = ChatRequest {
            model: "o3-mini".to_string(),
            messages: vec![Message::system("Be brief."), Message::user("Hello")],
            max_completion_tokens: Some(8096),
            tools: None,
            tool_choice: None,
            audio: None,
            modalities: None,
        };

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "o3-mini");
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
        assert_eq!(json["max_completion_tokens"], 8096);
        assert!(json.get("tools").is_none());
        assert!(json.get("tool_choice").is_none());
        assert!(json.get("audio").is_none());
    }

    #[test]
    fn chat_request_with_tools_and_audio() {
        let request = ChatRequest {
            model: "gpt-4o-audio-preview".to_string(),
            messages: vec![Message::user("Say hi")],
            max_completion_tokens: None,
            tools: Some(vec![ToolDefinition::new(
                "terminal",
                "Run a command",
                json!({"type": "object", "properties": {"command": {"type": "string"}}}),
            )]),
            tool_choice: Some("auto".to_string()),
            audio: Some(AudioParams {
                voice: "alloy".to_string(),
                format: "wav".to_string(),
            }),
            modalities: Some(vec!["text".to_string()]),
        };

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["tool_choice"], "auto");
        assert_eq!(json["audio"]["voice"], "alloy");
        assert_eq!(json["audio"]["format"], "wav");
        assert_eq!(json["modalities"][0], "text");
        assert!(json.get("max_completion_tokens").is_none());
    }

    #[test]
    fn chat_response_parsing() {
        let api_json = json!({
            "id": "chatcmpl-abc123",
            "choices": [{
                "message": {
                    "content": "Hello! How can I help?",
                    "tool_calls": null
                },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 10,
                "completion_tokens": 8,
                "total_tokens": 18
            }
        });

        let resp: ChatResponse = serde_json::from_value(api_json).unwrap();
        let msg = resp.message().unwrap();

        assert_eq!(msg.content.as_deref(), Some("Hello! How can I help?"));
        assert!(msg.tool_calls.is_none());
        assert_eq!(resp.usage.as_ref().unwrap().total_tokens, 18);
    }

    #[test]
    fn chat_response_with_tool_calls() {
        let api_json = json!({
            "id": "chatcmpl-xyz",
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_42",
                        "type": "function",
                        "function": {
                            "name": "terminal",
                            "arguments": "{\"command\": \"ls -la\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": null
        });

        let resp: ChatResponse = serde_json::from_value(api_json).unwrap();
        let msg = resp.into_message().unwrap();

        assert!(msg.content.is_none());
        let calls = msg.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.name, "terminal");

        let transcript_entry: Message = msg.into();
        assert_eq!(transcript_entry.tool_calls().unwrap().len(), 1);
    }

    #[test]
    fn chat_response_with_audio() {
        let api_json = json!({
            "id": "chatcmpl-audio",
            "choices": [{
                "message": {
                    "content": null,
                    "audio": {
                        "id": "audio_1",
                        "data": "UklGRiQAAABXQVZF",
                        "transcript": "Hello there."
                    }
                },
                "finish_reason": "stop"
            }],
            "usage": null
        });

        let resp: ChatResponse = serde_json::from_value(api_json).unwrap();
        let msg = resp.into_message().unwrap();
        let audio = msg.audio.as_ref().unwrap();
        assert_eq!(audio.data.as_deref(), Some("UklGRiQAAABXQVZF"));
        assert_eq!(audio.transcript.as_deref(), Some("Hello there."));
    }

    #[test]
    fn chat_response_empty_choices() {
        let api_json = json!({
            "id": "chatcmpl-empty",
            "choices": [],
            "usage": null
        });

        let resp: ChatResponse = serde_json::from_value(api_json).unwrap();
        assert!(resp.message().is_none());
    }

    #[test]
    fn message_round_trip() {
        let messages = vec![
            Message::system("You are Parley."),
            Message::user("What is 2+2?"),
            Message::assistant("The answer is 4."),
            Message::tool_result("call_1", "done"),
        ];

        let json_str = serde_json::to_string(&messages).unwrap();
        let deserialized: Vec<Message> = serde_json::from_str(&json_str).unwrap();

        assert_eq!(messages, deserialized);
    }
}
