//! Sink construction: open, decode and position a file, reporting failures
//! as text rather than tearing the player down.

use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::library::Track;

/// Create a paused `Sink` for `track` starting at `start_at`.
///
/// A file that cannot be opened or decoded yields a human-readable message;
/// the caller shows it and stays idle instead of advancing.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    track: &Track,
    start_at: Duration,
) -> Result<Sink, String> {
    let file = File::open(&track.path)
        .map_err(|e| format!("cannot open {}: {e}", track.path.display()))?;

    let source = Decoder::new(BufReader::new(file))
        .map_err(|e| format!("cannot play {}: {e}", track.path.display()))?
        // `skip_duration` is the seeking primitive; Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
