//! Parley core — wire types, transcript state machine, and configuration.
//!
//! This crate contains:
//! - **types**: OpenAI chat-completions message/request/response types
//! - **transcript**: role-constrained conversation history with sticky
//!   modality tracking
//! - **config**: schema + loader for `~/.parley/config.json`
//! - **utils**: path helpers

pub mod config;
pub mod transcript;
pub mod types;
pub mod utils;

pub use transcript::{Modality, Transcript, TranscriptError};
pub use types::{
    AudioParams, AudioPayload, ChatRequest, ChatResponse, ContentPart, Message, MessageContent,
    Role, ToolCall, ToolDefinition,
};
