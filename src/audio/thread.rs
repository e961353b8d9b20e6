use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::library::Track;

use super::sink::create_sink_at;
use super::types::{AudioCmd, PlaybackHandle, clamp_volume};

/// Everything the playback thread owns. One live sink at most; `track` is
/// whatever that sink was built from.
struct Playback {
    stream: OutputStream,
    info: PlaybackHandle,
    sink: Option<Sink>,
    track: Option<Track>,
    paused: bool,
    volume: f32,
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Playback {
    fn load(&mut self, track: Track, volume: f32) {
        // Release the previous handle before creating the next one, so two
        // sinks never overlap.
        if let Some(s) = self.sink.take() {
            s.stop();
        }

        self.volume = clamp_volume(volume);

        match create_sink_at(&self.stream, &track, Duration::ZERO) {
            Ok(sink) => {
                sink.set_volume(self.volume);
                sink.play();

                self.paused = false;
                self.started_at = Some(Instant::now());
                self.accumulated = Duration::ZERO;

                if let Ok(mut info) = self.info.lock() {
                    info.path = Some(track.path.clone());
                    info.total = track.duration;
                    info.elapsed = Duration::ZERO;
                    info.playing = true;
                    info.finished = false;
                    info.error = None;
                }

                self.sink = Some(sink);
                self.track = Some(track);
            }
            Err(msg) => {
                // Unplayable file: surface the message, stay idle, let the
                // user decide what to do next.
                self.track = None;
                self.paused = true;
                self.started_at = None;
                self.accumulated = Duration::ZERO;

                if let Ok(mut info) = self.info.lock() {
                    info.path = None;
                    info.total = None;
                    info.elapsed = Duration::ZERO;
                    info.playing = false;
                    info.finished = false;
                    info.error = Some(msg);
                }
            }
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.track = None;
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;

        if let Ok(mut info) = self.info.lock() {
            info.path = None;
            info.total = None;
            info.elapsed = Duration::ZERO;
            info.playing = false;
            info.finished = false;
        }
    }

    fn toggle_pause(&mut self) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };

        if self.paused {
            s.play();
            self.started_at = Some(Instant::now());
            if let Ok(mut info) = self.info.lock() {
                info.playing = true;
            }
        } else {
            s.pause();
            if let Some(st) = self.started_at.take() {
                self.accumulated += st.elapsed();
            }
            if let Ok(mut info) = self.info.lock() {
                info.playing = false;
            }
        }
        self.paused = !self.paused;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = clamp_volume(volume);
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(self.volume);
        }
    }

    fn seek_by(&mut self, secs: i32) {
        // Scrubbing rebuilds the sink and skips into the file.
        let Some(track) = self.track.clone() else {
            return;
        };
        if self.sink.is_none() {
            return;
        }

        let elapsed = self.accumulated
            + self
                .started_at
                .map_or(Duration::ZERO, |st| st.elapsed());
        let cur = elapsed.as_secs() as i64;
        let new_elapsed = Duration::from_secs((cur + secs as i64).max(0) as u64);

        if let Some(s) = self.sink.take() {
            s.stop();
        }

        match create_sink_at(&self.stream, &track, new_elapsed) {
            Ok(sink) => {
                sink.set_volume(self.volume);
                if self.paused {
                    self.started_at = None;
                } else {
                    sink.play();
                    self.started_at = Some(Instant::now());
                }
                self.sink = Some(sink);
                self.accumulated = new_elapsed;
                if let Ok(mut info) = self.info.lock() {
                    info.elapsed = new_elapsed;
                }
            }
            Err(msg) => {
                // The file went bad under us; treat it like a failed load.
                self.track = None;
                self.paused = true;
                self.started_at = None;
                if let Ok(mut info) = self.info.lock() {
                    info.path = None;
                    info.playing = false;
                    info.error = Some(msg);
                }
            }
        }
    }

    /// End-of-track check, run on every receive timeout. A drained sink
    /// while unpaused means the track completed: flag it once and go idle
    /// until the event loop decides what plays next.
    fn check_finished(&mut self) {
        let finished = self
            .sink
            .as_ref()
            .map(|s| !self.paused && s.empty())
            .unwrap_or(false);
        if !finished {
            return;
        }

        self.sink = None;
        self.track = None;
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;

        if let Ok(mut info) = self.info.lock() {
            info.playing = false;
            info.finished = true;
        }
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(s) = self.sink.take() {
            fade_out_sink(&s, fade_out_ms);
            s.stop();
        }
        if let Ok(mut info) = self.info.lock() {
            info.playing = false;
        }
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    let start = sink.volume();
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(start * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    initial_volume: f32,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped; noisy for a TUI.
        stream.log_on_drop(false);

        // Ticker thread keeps the shared elapsed time moving while playing.
        let info_for_ticker = playback_info.clone();
        thread::spawn(move || {
            loop {
                thread::sleep(Duration::from_millis(500));
                if let Ok(mut info) = info_for_ticker.lock() {
                    if info.playing {
                        info.elapsed += Duration::from_millis(500);
                    }
                }
            }
        });

        let mut playback = Playback {
            stream,
            info: playback_info,
            sink: None,
            track: None,
            paused: true,
            volume: clamp_volume(initial_volume),
            started_at: None,
            accumulated: Duration::ZERO,
        };

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(AudioCmd::Load { track, volume }) => playback.load(track, volume),
                Ok(AudioCmd::Stop) => playback.stop(),
                Ok(AudioCmd::TogglePause) => playback.toggle_pause(),
                Ok(AudioCmd::SetVolume(v)) => playback.set_volume(v),
                Ok(AudioCmd::SeekBy(secs)) => playback.seek_by(secs),
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    playback.quit(fade_out_ms);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => playback.check_finished(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
