//! Transcript — the ordered, role-constrained message history of one
//! conversation.
//!
//! Role ordering is enforced as an explicit state machine on every append:
//!
//! 1. Exactly one `system` message, always first.
//! 2. A `tool` message may only follow an assistant message carrying tool
//!    calls, or another `tool` message from the same batch.
//! 3. Two `assistant` messages are never adjacent.
//!
//! A fourth rule drives role *inference* for plain appends: after
//! `system`/`assistant` the next plain message is a `user` turn, after
//! `user`/`tool` it is an `assistant` turn, and a `tool_call_id` always
//! forces the `tool` role.
//!
//! A transcript also tracks the conversation [`Modality`]: once audio input
//! or output appears, the conversation stays in audio mode until `reset()`.

use thiserror::Error;

use crate::types::{Message, MessageContent, Role};

// ─────────────────────────────────────────────
// Modality
// ─────────────────────────────────────────────

/// Whether the conversation is text-only or audio-augmented.
///
/// Sticky: switching to `Audio` persists for the life of the transcript.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Modality {
    #[default]
    Text,
    Audio,
}

// ─────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────

/// A transcript invariant was violated. Always a caller/logic bug,
/// never recoverable by retrying.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("invalid role sequence: '{attempted}' cannot follow '{previous}'")]
    InvalidRoleSequence { attempted: Role, previous: Role },
}

// ─────────────────────────────────────────────
// Transcript
// ─────────────────────────────────────────────

/// Ordered message history, owned exclusively by one conversation engine.
///
/// Constructed with its system message, so there is no empty state: any
/// later explicit `system` append violates invariant 1 and fails.
#[derive(Clone, Debug)]
pub struct Transcript {
    system_prompt: String,
    messages: Vec<Message>,
    modality: Modality,
}

impl Transcript {
    /// Create a transcript seeded with its single system message.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let system_prompt = system_prompt.into();
        let messages = vec![Message::system(system_prompt.clone())];
        Transcript {
            system_prompt,
            messages,
            modality: Modality::Text,
        }
    }

    /// Validate invariants 1–3 and append. Pure state-transition check;
    /// no side effects on external systems.
    pub fn append(&mut self, message: Message) -> Result<(), TranscriptError> {
        let attempted = message.role();
        let previous = self.last_role();

        let valid = match attempted {
            // The system message exists from construction; a second one is
            // never legal.
            Role::System => false,
            Role::Tool => match self.messages.last() {
                Some(prev @ Message::Assistant { .. }) => prev.tool_calls().is_some(),
                Some(Message::Tool { .. }) => true,
                _ => false,
            },
            Role::Assistant => previous != Role::Assistant,
            Role::User => true,
        };

        if !valid {
            return Err(TranscriptError::InvalidRoleSequence {
                attempted,
                previous,
            });
        }

        self.messages.push(message);
        Ok(())
    }

    /// Append content with the role inferred from the preceding message
    /// (invariant 4), then validate as usual.
    ///
    /// A `tool_call_id` forces the `tool` role regardless of position.
    pub fn append_inferred(
        &mut self,
        content: MessageContent,
        tool_call_id: Option<String>,
    ) -> Result<(), TranscriptError> {
        let message = match tool_call_id {
            Some(id) => {
                let text = match content {
                    MessageContent::Text(t) => t,
                    // Tool results are always textual on the wire.
                    parts => serde_json::to_string(&parts).unwrap_or_default(),
                };
                Message::tool_result(id, text)
            }
            None => match self.last_role() {
                Role::System | Role::Assistant => Message::User { content },
                Role::User | Role::Tool => {
                    let text = match content {
                        MessageContent::Text(t) => t,
                        parts => serde_json::to_string(&parts).unwrap_or_default(),
                    };
                    Message::assistant(text)
                }
            },
        };
        self.append(message)
    }

    /// Truncate back to the single system message and clear the modality
    /// to text.
    pub fn reset(&mut self) {
        self.messages.truncate(1);
        debug_assert_eq!(self.messages[0].role(), Role::System);
        self.modality = Modality::Text;
    }

    /// Immutable ordered copy for request construction.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    /// Role of the last message. Never empty, so this always exists.
    pub fn last_role(&self) -> Role {
        self.messages
            .last()
            .map(Message::role)
            .unwrap_or(Role::System)
    }

    /// The last message, if any beyond the system prompt exists.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages, system prompt included.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Only true before construction completes, i.e. never. Kept for
    /// symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Current conversation modality.
    pub fn modality(&self) -> Modality {
        self.modality
    }

    /// Switch to audio modality. Sticky until [`Transcript::reset`].
    pub fn mark_audio(&mut self) {
        self.modality = Modality::Audio;
    }

    /// The system prompt this transcript was created with.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
