//! Transport layer for Parley.
//!
//! # Architecture
//!
//! - [`traits::ChatTransport`] — the request/response seam the conversation
//!   engine talks through (mocked in engine tests)
//! - [`http::HttpTransport`] — reqwest client for any OpenAI-compatible
//!   `/chat/completions` endpoint
//!
//! Retry policy lives in the engine, not here: a transport attempt is
//! exactly one HTTP round-trip.

pub mod http;
pub mod traits;

pub use http::HttpTransport;
pub use traits::{ChatTransport, TransportError};
