//! User turn construction.
//!
//! Media attachments are read and base64-encoded eagerly when the turn is
//! built, so a transcript snapshot is self-contained and a later replay
//! never depends on files still existing on disk.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::debug;

use parley_core::types::{ContentPart, ImageUrl, InputAudio, MessageContent};

/// One user turn: text plus any number of encoded media attachments.
#[derive(Clone, Debug, Default)]
pub struct UserInput {
    text: String,
    parts: Vec<ContentPart>,
}

impl UserInput {
    /// A plain text turn.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parts: Vec::new(),
        }
    }

    /// Attach an image file, encoded immediately as a base64 data URI.
    pub fn with_image(mut self, path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("cannot read image '{}': {e}", path.display()))?;
        let mime = match path.extension().and_then(|e| e.to_str()) {
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "image/jpeg",
        };
        debug!(path = %path.display(), bytes = bytes.len(), "encoded image attachment");
        self.parts.push(ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: format!("data:{mime};base64,{}", BASE64.encode(&bytes)),
                detail: None,
            },
        });
        Ok(self)
    }

    /// Attach recorded audio, encoded immediately as base64 WAV.
    pub fn with_audio_wav(mut self, wav: &[u8]) -> Self {
        debug!(bytes = wav.len(), "encoded audio attachment");
        self.parts.push(ContentPart::InputAudio {
            input_audio: InputAudio {
                data: BASE64.encode(wav),
                format: "wav".to_string(),
            },
        });
        self
    }

    /// Attach an audio file from disk, encoded immediately.
    pub fn with_audio_file(self, path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("cannot read audio '{}': {e}", path.display()))?;
        Ok(self.with_audio_wav(&bytes))
    }

    /// Whether this turn carries an audio attachment.
    pub fn has_audio(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, ContentPart::InputAudio { .. }))
    }

    /// Convert into wire content. A turn without attachments stays a plain
    /// string; attachments switch to the multipart form with the text first.
    pub fn into_content(self) -> MessageContent {
        if self.parts.is_empty() {
            return MessageContent::Text(self.text);
        }
        let mut parts = Vec::with_capacity(self.parts.len() + 1);
        if !self.text.is_empty() {
            parts.push(ContentPart::Text { text: self.text });
        }
        parts.extend(self.parts);
        MessageContent::Parts(parts)
    }
}
