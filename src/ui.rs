//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. It only
//! reads the `App` model; every gesture goes back through the runtime as a
//! controller call.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, InputMode, PlaybackState};
use crate::config::{ControlsSettings, UiSettings};
use crate::playlist::PlayMode;

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    [
        "[j/k] up/down",
        "[h/l] prev/next song",
        "SCRUB",
        "[enter] play selected",
        "[space/p] play/pause",
        "[x] stop",
        "[m] play mode",
        "[-/+] volume",
        "[a] add track",
        "[d] remove track",
        "[gg/G] top/bottom",
        "[/] filter",
        "[q] quit",
    ]
    .iter()
    .map(|s| {
        if *s == "SCRUB" {
            format!("[H/L] scrub -/+{}s", scrub_seconds)
        } else {
            s.to_string()
        }
    })
    .collect::<Vec<String>>()
    .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn mode_label(mode: PlayMode) -> &'static str {
    match mode {
        PlayMode::LoopAll => "Loop-all",
        PlayMode::Shuffle => "Shuffle",
        PlayMode::LoopOne => "Repeat-one",
    }
}

/// Build one list row, marking the playing track and emphasizing the
/// characters the fuzzy filter matched.
fn list_item<'a>(app: &'a App, track_index: usize, playing: Option<usize>) -> ListItem<'a> {
    let track = &app.controller.tracks()[track_index];
    let marker = if playing == Some(track_index) {
        "▶ "
    } else {
        "  "
    };

    let q = app.filter_query.trim();
    let mut spans: Vec<Span> = vec![Span::raw(marker)];

    let positions = if q.is_empty() {
        None
    } else {
        App::fuzzy_match_positions(&track.display, q)
    };

    match positions {
        Some(positions) => {
            let mut pos_iter = positions.into_iter();
            let mut next_pos = pos_iter.next();
            for (ci, ch) in track.display.chars().enumerate() {
                if next_pos == Some(ci) {
                    spans.push(Span::styled(
                        ch.to_string(),
                        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                    ));
                    next_pos = pos_iter.next();
                } else {
                    spans.push(Span::raw(ch.to_string()));
                }
            }
        }
        None => spans.push(Span::raw(track.display.as_str())),
    }

    ListItem::new(Line::from(spans))
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    display: &[usize],
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" echoplay ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = {
        let mut parts: Vec<String> = Vec::new();

        parts.push(format!("MODE: {}", mode_label(app.controller.mode())));
        parts.push(format!("VOL: {:.0}%", app.volume * 100.0));

        if app.follow_playback {
            parts.push("CURSOR: Follow".to_string());
        } else {
            parts.push("CURSOR: Free-roam".to_string());
        }

        match app.input_mode {
            InputMode::Filter => parts.push(format!("FILTER: {}▏", app.filter_query)),
            InputMode::AddPath => parts.push(format!("ADD PATH: {}▏", app.input_buffer)),
            InputMode::Normal => {
                let q = app.filter_query.trim();
                if !q.is_empty() {
                    parts.push(format!("FILTER: {q}"));
                }
            }
        }

        // Now playing, straight from the media handle snapshot.
        let mut now_playing = None;
        if let Some(ref h) = app.playback_handle {
            if let Ok(info) = h.lock() {
                if let Some(err) = &info.error {
                    parts.push(format!("ERROR: {err}"));
                }
                if let Some(path) = &info.path {
                    let text = app
                        .controller
                        .position_of(path)
                        .map(|i| app.controller.tracks()[i].now_playing_text())
                        .unwrap_or_else(|| path.display().to_string());
                    let time = match info.total {
                        Some(t) => format!("{} / {}", format_mmss(info.elapsed), format_mmss(t)),
                        None => format_mmss(info.elapsed),
                    };
                    now_playing = Some(format!("Song: {text} [{time}]"));
                }
            }
        }
        match now_playing {
            Some(s) => {
                parts.push(s);
                parts.push(
                    match app.playback {
                        PlaybackState::Playing => "Playing",
                        PlaybackState::Paused => "Paused",
                        PlaybackState::Stopped => "Stopped",
                    }
                    .to_string(),
                );
            }
            None => parts.push("Stopped".to_string()),
        }

        if let Some(msg) = &app.status {
            parts.push(msg.clone());
        }
        if let Some(dir) = &app.music_dir {
            parts.push(format!("Dir: {dir}"));
        }

        parts.join(" • ")
    };

    let status_par = Paragraph::new(status)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Track list: window the visible slice so the selection stays centered
    // and huge playlists don't allocate a row per track.
    {
        let playing = app.playing_index();
        let total = display.len();
        let list_height = chunks[2].height as usize;
        let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = if sel_pos > half { sel_pos - half } else { 0 };
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = display[start..end]
            .iter()
            .map(|&i| list_item(app, i, playing))
            .collect();

        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(" library "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_mmss_pads_minutes_and_seconds() {
        assert_eq!(format_mmss(Duration::ZERO), "00:00");
        assert_eq!(format_mmss(Duration::from_secs(65)), "01:05");
        assert_eq!(format_mmss(Duration::from_secs(600)), "10:00");
    }

    #[test]
    fn mode_labels_cover_all_modes() {
        assert_eq!(mode_label(PlayMode::LoopAll), "Loop-all");
        assert_eq!(mode_label(PlayMode::Shuffle), "Shuffle");
        assert_eq!(mode_label(PlayMode::LoopOne), "Repeat-one");
    }

    #[test]
    fn controls_text_mentions_the_configured_scrub() {
        assert!(controls_text(7).contains("-/+7s"));
    }
}
