use std::path::PathBuf;

use crate::audio::PlaybackHandle;
use crate::playlist::PlaylistController;

/// The playback state of the application.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// What the keyboard currently feeds: list navigation, the filter box or the
/// add-track prompt.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Filter,
    AddPath,
}

/// The main application model.
///
/// `selected` is an index into the controller's track list (not a visible
/// row number), so it survives filter changes; anything that plays a row
/// resolves it to a path first.
pub struct App {
    pub controller: PlaylistController,
    pub selected: usize,
    pub playback: PlaybackState,
    pub playback_handle: Option<PlaybackHandle>,

    pub volume: f32,

    pub input_mode: InputMode,
    pub filter_query: String,
    pub input_buffer: String,

    /// Transient user-visible message (load errors, add/remove results).
    pub status: Option<String>,

    pub follow_playback: bool,
    pub music_dir: Option<String>,
}

impl App {
    /// Create a new `App` around an already-populated controller.
    pub fn new(controller: PlaylistController) -> Self {
        Self {
            controller,
            selected: 0,
            playback: PlaybackState::default(),
            playback_handle: None,
            volume: 0.5,
            input_mode: InputMode::default(),
            filter_query: String::new(),
            input_buffer: String::new(),
            status: None,
            follow_playback: true,
            music_dir: None,
        }
    }

    /// Attach a `PlaybackHandle` used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    /// Record the music directory in the app state.
    pub fn set_music_dir(&mut self, dir: String) {
        self.music_dir = Some(dir);
    }

    pub fn has_tracks(&self) -> bool {
        !self.controller.is_empty()
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Enable following playback (cursor follows currently playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    /// Disable follow-playback.
    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Bump the volume slider by `delta`, clamped to the 0..=1 range.
    pub fn adjust_volume(&mut self, delta: f32) -> f32 {
        self.volume = crate::audio::clamp_volume(self.volume + delta);
        self.volume
    }

    /// The path of the track currently loaded in the media handle, if any.
    pub fn playing_path(&self) -> Option<PathBuf> {
        self.playback_handle
            .as_ref()
            .and_then(|h| h.lock().ok())
            .and_then(|info| info.path.clone())
    }

    /// The controller index of the playing track, resolved by identity so it
    /// stays correct while entries are added or removed.
    pub fn playing_index(&self) -> Option<usize> {
        let path = self.playing_path()?;
        self.controller.position_of(&path)
    }

    /// Controller indices currently visible, in list order, honoring the
    /// fuzzy filter.
    pub fn display_indices(&self) -> Vec<usize> {
        let query = self.filter_query.trim();
        let all = 0..self.controller.len();
        if query.is_empty() {
            return all.collect();
        }

        all.filter(|&i| {
            Self::fuzzy_match_positions(&self.controller.tracks()[i].display, query).is_some()
        })
        .collect()
    }

    /// The path behind the selection cursor, if the cursor points at a
    /// visible row.
    pub fn selected_path(&self) -> Option<PathBuf> {
        if !self.display_indices().contains(&self.selected) {
            return None;
        }
        self.controller
            .tracks()
            .get(self.selected)
            .map(|t| t.path.clone())
    }

    /// Fuzzy/subsequence match: return the character positions in `title`
    /// that match `query`, or `None` if not matched.
    pub fn fuzzy_match_positions(title: &str, query: &str) -> Option<Vec<usize>> {
        if query.is_empty() {
            return Some(Vec::new());
        }

        let mut positions: Vec<usize> = Vec::new();
        let mut title_iter = title.chars().enumerate();

        for qc in query.chars() {
            let qc_low = qc.to_ascii_lowercase();
            loop {
                match title_iter.next() {
                    Some((ti, tc)) if tc.to_ascii_lowercase() == qc_low => {
                        positions.push(ti);
                        break;
                    }
                    Some(_) => continue,
                    None => return None,
                }
            }
        }

        Some(positions)
    }

    /// Return the next visible index in the current display order after
    /// `current`. Wraps around to the first element.
    pub fn next_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        match display.iter().position(|&i| i == current) {
            Some(p) => Some(display[(p + 1) % display.len()]),
            None => Some(display[0]),
        }
    }

    /// Return the previous visible index in the current display order before
    /// `current`. Wraps around to the last element.
    pub fn prev_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        match display.iter().position(|&i| i == current) {
            Some(0) => Some(display[display.len() - 1]),
            Some(p) => Some(display[p - 1]),
            None => Some(display[display.len() - 1]),
        }
    }

    /// Set the selected track index and ensure it is visible.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx;
        self.ensure_selected_visible();
    }

    /// Move selection to the next visible track.
    pub fn next(&mut self) {
        if let Some(next) = self.next_in_view_from(self.selected) {
            self.selected = next;
        }
    }

    /// Move selection to the previous visible track.
    pub fn prev(&mut self) {
        if let Some(prev) = self.prev_in_view_from(self.selected) {
            self.selected = prev;
        }
    }

    /// Ensure that `selected` is part of the current filtered view,
    /// otherwise move selection to the first visible track.
    pub fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            self.selected = 0;
            return;
        }

        if !display.contains(&self.selected) {
            self.selected = display[0];
        }
    }

    /// Enter filter mode: subsequent printable keys narrow the list.
    pub fn enter_filter_mode(&mut self) {
        self.input_mode = InputMode::Filter;
        self.follow_playback_off();
        self.ensure_selected_visible();
    }

    /// Leave filter mode but keep the query applied.
    pub fn exit_filter_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Clear the active filter and restore selection visibility.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.input_mode = InputMode::Normal;
        self.ensure_selected_visible();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    /// Open the add-track prompt.
    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::AddPath;
        self.input_buffer.clear();
    }

    /// Abandon the add-track prompt.
    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    pub fn push_input_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn pop_input_char(&mut self) {
        self.input_buffer.pop();
    }

    /// Close the prompt and hand its contents to the caller.
    pub fn take_input_buffer(&mut self) -> String {
        self.input_mode = InputMode::Normal;
        std::mem::take(&mut self.input_buffer)
    }
}
