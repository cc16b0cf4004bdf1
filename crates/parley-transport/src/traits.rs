//! Transport abstraction — one request in, one response or error out.
//!
//! The transport has **no retry or backoff logic of its own**; the
//! conversation engine owns the single-retry policy and needs typed errors
//! to apply it uniformly to network and application failures.

use async_trait::async_trait;
use thiserror::Error;

use parley_core::types::{ChatRequest, ChatResponse};

/// A transport failure. Network errors, non-success statuses, and undecodable
/// bodies are all shapes of the same thing to the caller: one retryable
/// failure.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP request itself failed (connect, timeout, TLS, ...).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("endpoint returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The body came back 2xx but could not be decoded as a chat completion.
    #[error("could not decode response body: {0}")]
    Decode(String),
}

/// Sends a chat-completion request payload and returns the structured
/// response. Implementations must be usable behind `Arc<dyn ChatTransport>`.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send one request. Exactly one attempt; the caller decides about
    /// retries.
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError>;

    /// Human-readable endpoint description for logging.
    fn endpoint(&self) -> &str;
}
