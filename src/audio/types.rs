//! Small types shared between the playback thread and the event loop.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::library::Track;

#[derive(Debug)]
pub enum AudioCmd {
    /// Stop whatever is playing, then load and start `track` at `volume`.
    Load { track: Track, volume: f32 },
    /// Stop playback and go idle.
    Stop,
    /// Flip pause/resume on the live sink.
    TogglePause,
    /// Apply a new volume to the live sink (also used for future loads by the
    /// caller, which passes it with every `Load`).
    SetVolume(f32),
    /// Scrub by the given number of seconds, forward or back.
    SeekBy(i32),
    /// Shut the playback thread down, fading out over `fade_out_ms`.
    Quit { fade_out_ms: u64 },
}

/// Snapshot of playback state shared with the UI thread.
///
/// `finished` flips to true exactly once when a track plays to its end; the
/// event loop consumes it and advances under the current play mode. `error`
/// carries a display-only message for unplayable files.
#[derive(Debug, Clone)]
pub struct PlaybackInfo {
    pub path: Option<PathBuf>,
    pub elapsed: Duration,
    pub total: Option<Duration>,
    pub playing: bool,
    pub finished: bool,
    pub error: Option<String>,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            path: None,
            elapsed: Duration::ZERO,
            total: None,
            playing: false,
            finished: false,
            error: None,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// Volumes live on the 0.0..=1.0 slider scale.
pub fn clamp_volume(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}
