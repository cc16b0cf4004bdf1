//! Audio playback.
//!
//! Playback is fire-and-forget: handing WAV bytes to the sink never blocks
//! the conversation loop and never surfaces an error to the caller. A
//! playback failure only costs the audible rendition — the transcript
//! already carries the assistant text.

use std::path::PathBuf;
use std::process::Stdio;

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

/// Consumes decoded WAV bytes for playback.
pub trait AudioSink: Send + Sync {
    /// Begin playback of `wav`. Must not block.
    fn play(&self, wav: Vec<u8>);
}

/// Plays audio by spawning an external player on a temporary WAV file.
pub struct CommandPlayer {
    player: String,
}

impl CommandPlayer {
    /// `player` is the binary invoked with the WAV path as its only
    /// argument, e.g. "aplay" or "afplay".
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
        }
    }

    fn temp_wav_path() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!("parley-{}-{}.wav", std::process::id(), nanos))
    }
}

impl AudioSink for CommandPlayer {
    fn play(&self, wav: Vec<u8>) {
        let player = self.player.clone();
        let path = Self::temp_wav_path();
        tokio::spawn(async move {
            if let Err(e) = tokio::fs::write(&path, &wav).await {
                warn!(path = %path.display(), error = %e, "failed to write audio file");
                return;
            }
            debug!(player = %player, path = %path.display(), "starting audio playback");
            let spawned = tokio::process::Command::new(&player)
                .arg(&path)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            match spawned {
                Ok(mut child) => match child.wait().await {
                    Ok(status) if !status.success() => {
                        warn!(player = %player, %status, "audio player exited with failure");
                    }
                    Ok(_) => {}
                    Err(e) => warn!(player = %player, error = %e, "audio player wait failed"),
                },
                Err(e) => warn!(player = %player, error = %e, "failed to spawn audio player"),
            }
            let _ = tokio::fs::remove_file(&path).await;
        });
    }
}

/// Discards audio. Used when playback is disabled or unavailable.
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&self, _wav: Vec<u8>) {}
}
