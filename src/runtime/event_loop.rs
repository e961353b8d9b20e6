use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, InputMode, PlaybackState};
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;
use crate::library;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::playlist::Direction;
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Last now-playing identity as emitted to MPRIS.
    pub last_mpris_path: Option<PathBuf>,
    /// Last playback state as emitted to MPRIS.
    pub last_mpris_playback: PlaybackState,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `app`.
    pub fn new(app: &App) -> Self {
        Self {
            pending_gg: false,
            last_mpris_path: None,
            last_mpris_playback: app.playback,
        }
    }
}

/// Main terminal event loop: handles input, UI drawing, sync with the
/// playback thread and MPRIS. Returns `Ok(())` when shutdown is requested.
#[allow(clippy::too_many_arguments)]
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // End-of-track notifications arrive as a flag in the shared
        // snapshot; consume it and advance under the current play mode.
        // This is also how Repeat-one replays the same track.
        let mut track_finished = false;
        let mut load_error = false;
        if let Some(handle) = app.playback_handle.as_ref().cloned() {
            if let Ok(mut info) = handle.lock() {
                if info.finished {
                    info.finished = false;
                    track_finished = true;
                }
                if info.error.is_some() {
                    load_error = true;
                }
            }
        }
        if track_finished && !load_error {
            play_advance(app, audio_player, Direction::Forward);
        }

        // Sync playback state from the playback thread; optionally follow
        // now-playing with the cursor.
        if let Some(handle) = app.playback_handle.as_ref().cloned() {
            if let Ok(info) = handle.lock() {
                app.playback = match (info.path.is_some(), info.playing) {
                    (true, true) => PlaybackState::Playing,
                    (true, false) => PlaybackState::Paused,
                    (false, _) => PlaybackState::Stopped,
                };
            }
        }
        if app.follow_playback && app.input_mode == InputMode::Normal {
            if let Some(idx) = app.playing_index() {
                if app.selected != idx {
                    app.set_selected(idx);
                }
            }
        }

        // Keep MPRIS in sync even when changes come from media keys or
        // auto-advance.
        let playing_path = app.playing_path();
        if playing_path != state.last_mpris_path || app.playback != state.last_mpris_playback {
            update_mpris(mpris, app);
            state.last_mpris_path = playing_path;
            state.last_mpris_playback = app.playback;
        }

        let display = app.display_indices();
        terminal.draw(|f| ui::draw(f, app, &display, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app, audio_player, mpris)? {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, audio_player, mpris, control_tx, state)? {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Load and start `track` at the last-known slider value. Every path that
/// plays anything funnels through here, so the previous sink is always
/// released first (the playback thread does that on `Load`).
fn play_track(app: &mut App, audio_player: &AudioPlayer, track: crate::library::Track) {
    app.clear_status();
    let _ = audio_player.send(AudioCmd::Load {
        track,
        volume: app.volume,
    });
    app.playback = PlaybackState::Playing;
}

/// Resolve `path` by identity and play it. Unknown paths are a no-op.
fn play_path(app: &mut App, audio_player: &AudioPlayer, path: &Path) {
    if let Some(track) = app.controller.select_path(path).cloned() {
        play_track(app, audio_player, track);
    }
}

/// Compute the next track under the current mode and play it.
fn play_advance(app: &mut App, audio_player: &AudioPlayer, dir: Direction) {
    if let Some(track) = app.controller.advance(dir).cloned() {
        play_track(app, audio_player, track);
    }
}

/// Flip pause when something is loaded, otherwise start the first visible
/// row (the filter narrows what "first track" means).
fn toggle_play_pause(app: &mut App, audio_player: &AudioPlayer) {
    if app.playing_path().is_some() {
        let _ = audio_player.send(AudioCmd::TogglePause);
        app.playback = match app.playback {
            PlaybackState::Playing => PlaybackState::Paused,
            _ => PlaybackState::Playing,
        };
        return;
    }

    let display = app.display_indices();
    if let Some(&first) = display.first() {
        let path = app.controller.tracks()[first].path.clone();
        play_path(app, audio_player, &path);
    }
}

/// Remove the selected row. Removing the playing track stops playback and
/// leaves the player idle; it never auto-advances.
fn remove_selected(app: &mut App, audio_player: &AudioPlayer) {
    let Some(path) = app.selected_path() else {
        return;
    };
    let Some(removed) = app.controller.remove_path(&path) else {
        return;
    };

    if removed.was_current {
        let _ = audio_player.send(AudioCmd::Stop);
        app.playback = PlaybackState::Stopped;
    }
    app.set_status(format!("Removed {}", removed.track.display));
    app.ensure_selected_visible();
}

/// Handle a submitted add-track path: extension-filtered, deduped, silent on
/// duplicates just like every other add source.
fn add_typed_path(app: &mut App, settings: &config::Settings, input: &str) {
    let input = input.trim();
    if input.is_empty() {
        return;
    }

    let path = PathBuf::from(input);
    if !path.is_file() {
        app.set_status(format!("No such file: {input}"));
        return;
    }
    if !library::is_audio_file(&path, &settings.library) {
        app.set_status(format!("Not an audio file: {input}"));
        return;
    }

    if app.controller.add_path(&path) {
        app.set_status(format!("Added {}", path.display()));
    }
}

fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
) -> Result<bool, Box<dyn std::error::Error>> {
    match cmd {
        ControlCmd::Quit => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(true);
        }
        ControlCmd::Play => match app.playback {
            PlaybackState::Paused => {
                let _ = audio_player.send(AudioCmd::TogglePause);
                app.playback = PlaybackState::Playing;
            }
            PlaybackState::Stopped => toggle_play_pause(app, audio_player),
            PlaybackState::Playing => {}
        },
        ControlCmd::Pause => {
            if app.playback == PlaybackState::Playing {
                let _ = audio_player.send(AudioCmd::TogglePause);
                app.playback = PlaybackState::Paused;
            }
        }
        ControlCmd::PlayPause => toggle_play_pause(app, audio_player),
        ControlCmd::Stop => {
            let _ = audio_player.send(AudioCmd::Stop);
            app.playback = PlaybackState::Stopped;
        }
        ControlCmd::Next => {
            if app.has_tracks() {
                play_advance(app, audio_player, Direction::Forward);
            }
        }
        ControlCmd::Prev => {
            if app.has_tracks() {
                play_advance(app, audio_player, Direction::Backward);
            }
        }
    }

    update_mpris(mpris, app);
    Ok(false)
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<bool, Box<dyn std::error::Error>> {
    match app.input_mode {
        InputMode::Filter => {
            state.pending_gg = false;
            match key.code {
                KeyCode::Esc => app.clear_filter(),
                KeyCode::Backspace => app.pop_filter_char(),
                KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.next();
                }
                KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.prev();
                }
                KeyCode::Char(c) => {
                    if !c.is_control() {
                        app.push_filter_char(c);
                    }
                }
                KeyCode::Enter => {
                    // Play by identity, never by remembered row number: the
                    // filter may have reordered or hidden rows since.
                    let Some(path) = app.selected_path() else {
                        return Ok(false);
                    };
                    app.exit_filter_mode();
                    app.follow_playback_on();
                    play_path(app, audio_player, &path);
                    update_mpris(mpris, app);
                }
                _ => {}
            }
            return Ok(false);
        }
        InputMode::AddPath => {
            state.pending_gg = false;
            match key.code {
                KeyCode::Esc => app.cancel_input(),
                KeyCode::Backspace => app.pop_input_char(),
                KeyCode::Enter => {
                    let input = app.take_input_buffer();
                    add_typed_path(app, settings, &input);
                }
                KeyCode::Char(c) => {
                    if !c.is_control() {
                        app.push_input_char(c);
                    }
                }
                _ => {}
            }
            return Ok(false);
        }
        InputMode::Normal => {}
    }

    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(true);
        }
        KeyCode::Char('/') => {
            state.pending_gg = false;
            app.enter_filter_mode();
        }
        KeyCode::Char('a') => {
            state.pending_gg = false;
            app.enter_add_mode();
        }
        KeyCode::Char('d') => {
            state.pending_gg = false;
            remove_selected(app, audio_player);
            update_mpris(mpris, app);
        }
        KeyCode::Char('m') => {
            state.pending_gg = false;
            app.controller.cycle_mode();
        }
        KeyCode::Char('x') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Stop);
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.follow_playback_off();
                let display = app.display_indices();
                if let Some(&first) = display.first() {
                    app.set_selected(first);
                }
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            app.follow_playback_off();
            let display = app.display_indices();
            if let Some(&last) = display.last() {
                app.set_selected(last);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            app.follow_playback_off();
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            app.follow_playback_off();
            app.prev();
        }
        KeyCode::Enter => {
            state.pending_gg = false;
            if let Some(path) = app.selected_path() {
                let already_playing =
                    app.playback == PlaybackState::Playing && app.playing_path() == Some(path.clone());
                if !already_playing {
                    app.follow_playback_on();
                    play_path(app, audio_player, &path);
                    update_mpris(mpris, app);
                }
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') | KeyCode::Right => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') | KeyCode::Left => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('L') => {
            state.pending_gg = false;
            let secs = settings.controls.scrub_seconds.min(i32::MAX as u64) as i32;
            let _ = audio_player.send(AudioCmd::SeekBy(secs));
        }
        KeyCode::Char('H') => {
            state.pending_gg = false;
            let secs = settings.controls.scrub_seconds.min(i32::MAX as u64) as i32;
            let _ = audio_player.send(AudioCmd::SeekBy(-secs));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            state.pending_gg = false;
            let v = app.adjust_volume(settings.controls.volume_step);
            let _ = audio_player.send(AudioCmd::SetVolume(v));
        }
        KeyCode::Char('-') => {
            state.pending_gg = false;
            let v = app.adjust_volume(-settings.controls.volume_step);
            let _ = audio_player.send(AudioCmd::SetVolume(v));
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char.
            state.pending_gg = false;
        }
        _ => {}
    }

    Ok(false)
}
