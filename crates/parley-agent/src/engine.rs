//! Conversation engine.
//!
//! One [`Agent`] owns one [`Transcript`] and drives the model/tool loop:
//! append the user turn, send the transcript, and while the model keeps
//! requesting tool calls, dispatch them and resend — as an explicit bounded
//! loop, not recursion, so the depth limit is a plain counter check.
//!
//! Transport failures are retried exactly once after a fixed delay; a
//! response that parses but carries no assistant message yields the
//! [`MALFORMED_RESPONSE`] sentinel rather than an error, so callers always
//! have text to show.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;
use tracing::{debug, info, warn};

use parley_core::config::Config;
use parley_core::transcript::{Modality, Transcript, TranscriptError};
use parley_core::types::{
    AudioParams, ChatRequest, ChatResponse, Message, WireAssistantMessage,
};
use parley_transport::{ChatTransport, TransportError};

use crate::audio::{AudioSink, NullSink};
use crate::dispatch::{DispatchError, ToolCatalog};
use crate::input::UserInput;

/// Returned in place of assistant text when the endpoint's response parsed
/// but carried no usable message body, even after the retry.
pub const MALFORMED_RESPONSE: &str = "Response is of NoneType or invalid format";

// ─────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────

/// A conversation round failed.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// The endpoint failed on both the original attempt and the retry.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("tool dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

// ─────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────

/// Engine knobs, derived from [`Config`] once at construction.
#[derive(Clone, Debug)]
pub struct AgentSettings {
    pub text_model: String,
    pub audio_model: String,
    pub max_completion_tokens: u32,
    pub max_tool_recursions: u32,
    pub retry_delay: Duration,
    pub audio_enabled: bool,
    pub voice: String,
    pub audio_format: String,
    pub system_prompt: String,
}

impl AgentSettings {
    pub fn from_config(config: &Config) -> Self {
        AgentSettings {
            text_model: config.agent.model.clone(),
            audio_model: config.audio.model.clone(),
            max_completion_tokens: config.agent.max_completion_tokens,
            max_tool_recursions: config.agent.max_tool_recursions,
            retry_delay: Duration::from_millis(config.agent.retry_delay_ms),
            audio_enabled: config.audio.enabled,
            voice: config.audio.voice.clone(),
            audio_format: config.audio.format.clone(),
            system_prompt: config.agent.system_prompt.clone(),
        }
    }
}

// ─────────────────────────────────────────────
// Recursion counter
// ─────────────────────────────────────────────

/// Depth counter for consecutive tool rounds within one submission.
///
/// Checked *before* each increment, so `max = 0` means no tool rounds at
/// all. Reset on every `submit` exit (normal, at the bound, or error), so
/// each submission starts with a fresh budget.
#[derive(Clone, Copy, Debug)]
struct RecursionCounter {
    current: u32,
    max: u32,
}

impl RecursionCounter {
    fn new(max: u32) -> Self {
        RecursionCounter { current: 0, max }
    }

    fn exhausted(&self) -> bool {
        self.current >= self.max
    }

    fn increment(&mut self) {
        self.current += 1;
    }

    fn reset(&mut self) {
        self.current = 0;
    }
}

// ─────────────────────────────────────────────
// Agent
// ─────────────────────────────────────────────

/// One conversational agent instance.
pub struct Agent {
    identifier: String,
    transport: Arc<dyn ChatTransport>,
    catalog: Option<ToolCatalog>,
    transcript: Transcript,
    recursions: RecursionCounter,
    settings: AgentSettings,
    sink: Arc<dyn AudioSink>,
}

impl Agent {
    pub fn new(
        identifier: impl Into<String>,
        transport: Arc<dyn ChatTransport>,
        catalog: Option<ToolCatalog>,
        settings: AgentSettings,
    ) -> Self {
        Agent {
            identifier: identifier.into(),
            transport,
            catalog,
            transcript: Transcript::new(settings.system_prompt.clone()),
            recursions: RecursionCounter::new(settings.max_tool_recursions),
            settings,
            sink: Arc::new(NullSink),
        }
    }

    /// Replace the audio sink. The default sink discards audio.
    pub fn with_audio_sink(mut self, sink: Arc<dyn AudioSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Read access to the transcript, e.g. for status display.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Drop all history back to the system message; clears the audio
    /// modality and the recursion counter.
    pub fn reset(&mut self) {
        info!(agent = %self.identifier, "resetting conversation");
        self.transcript.reset();
        self.recursions.reset();
    }

    /// Run one submission to completion and return the assistant's text.
    ///
    /// `input` is the user's turn; `None` re-prompts on the existing
    /// transcript. The recursion counter is scoped to this call: it is
    /// cleared on every exit, error paths included.
    pub async fn submit(&mut self, input: Option<UserInput>) -> Result<String, AgentError> {
        let result = self.drive(input).await;
        if result.is_err() {
            self.recursions.reset();
        }
        result
    }

    async fn drive(&mut self, input: Option<UserInput>) -> Result<String, AgentError> {
        if let Some(input) = input {
            if input.has_audio() {
                self.transcript.mark_audio();
            }
            // Always a user turn, never inferred: a failed round leaves the
            // transcript ending in `user`, and inference there would store
            // the next input under the assistant role.
            self.transcript.append(Message::User {
                content: input.into_content(),
            })?;
        }

        loop {
            let request = self.build_request();
            let wire = match self.call_with_retry(&request).await? {
                Some(wire) => wire,
                None => {
                    warn!(agent = %self.identifier, "response carried no message body");
                    self.recursions.reset();
                    return Ok(MALFORMED_RESPONSE.to_string());
                }
            };

            self.handle_audio_output(&wire);

            let final_text = wire
                .content
                .clone()
                .or_else(|| wire.audio.as_ref().and_then(|a| a.transcript.clone()));

            let message: Message = wire.into();
            let calls: Vec<_> = message.tool_calls().map(|c| c.to_vec()).unwrap_or_default();
            self.transcript.append(message)?;

            if calls.is_empty() {
                self.recursions.reset();
                return Ok(final_text.unwrap_or_else(|| MALFORMED_RESPONSE.to_string()));
            }

            if self.recursions.exhausted() {
                warn!(
                    agent = %self.identifier,
                    max = self.recursions.max,
                    "tool recursion limit reached"
                );
                self.recursions.reset();
                return Ok(final_text.unwrap_or_else(|| MALFORMED_RESPONSE.to_string()));
            }
            self.recursions.increment();

            for call in calls {
                let output = match &self.catalog {
                    Some(catalog) => {
                        catalog
                            .dispatch(&call.function.name, &call.function.arguments)
                            .await?
                    }
                    None => {
                        return Err(DispatchError::UnknownTool(call.function.name).into());
                    }
                };
                debug!(
                    agent = %self.identifier,
                    tool = %call.function.name,
                    "tool call completed"
                );
                self.transcript
                    .append(Message::tool_result(call.id, output))?;
            }
        }
    }

    /// Build the request for the current transcript state. Audio mode is
    /// sticky: once the transcript is marked audio, every later request
    /// uses the audio model and parameters.
    fn build_request(&self) -> ChatRequest {
        let audio_mode =
            self.settings.audio_enabled && self.transcript.modality() == Modality::Audio;

        let tools = self
            .catalog
            .as_ref()
            .map(ToolCatalog::definitions)
            .filter(|defs| !defs.is_empty());
        let tool_choice = tools.as_ref().map(|_| "auto".to_string());

        ChatRequest {
            model: if audio_mode {
                self.settings.audio_model.clone()
            } else {
                self.settings.text_model.clone()
            },
            messages: self.transcript.snapshot(),
            max_completion_tokens: Some(self.settings.max_completion_tokens),
            tools,
            tool_choice,
            audio: audio_mode.then(|| AudioParams {
                voice: self.settings.voice.clone(),
                format: self.settings.audio_format.clone(),
            }),
            modalities: audio_mode.then(|| vec!["text".to_string()]),
        }
    }

    /// Send the request, retrying exactly once after the configured delay.
    ///
    /// Retried on both hard transport failures and responses that parse but
    /// carry no message body. A second hard failure propagates; a second
    /// empty body comes back as `Ok(None)` for the sentinel path.
    async fn call_with_retry(
        &self,
        request: &ChatRequest,
    ) -> Result<Option<WireAssistantMessage>, AgentError> {
        match self.transport.send(request).await {
            Ok(response) => {
                if let Some(wire) = Self::take_message(response) {
                    return Ok(Some(wire));
                }
                warn!(agent = %self.identifier, "empty response body, retrying once");
            }
            Err(e) => {
                warn!(agent = %self.identifier, error = %e, "request failed, retrying once");
            }
        }

        tokio::time::sleep(self.settings.retry_delay).await;

        let response = self.transport.send(request).await?;
        Ok(Self::take_message(response))
    }

    fn take_message(response: ChatResponse) -> Option<WireAssistantMessage> {
        response.into_message()
    }

    /// Decode and play assistant audio, if present, and mark the
    /// conversation as audio. Playback never blocks the loop.
    fn handle_audio_output(&mut self, wire: &WireAssistantMessage) {
        let Some(audio) = &wire.audio else { return };
        self.transcript.mark_audio();

        if !self.settings.audio_enabled {
            return;
        }
        let Some(data) = &audio.data else { return };
        match BASE64.decode(data) {
            Ok(bytes) => {
                debug!(agent = %self.identifier, bytes = bytes.len(), "playing assistant audio");
                self.sink.play(bytes);
            }
            Err(e) => warn!(agent = %self.identifier, error = %e, "undecodable assistant audio"),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
