use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::*;

/// One playable audio file in the library.
///
/// The absolute `path` is the track's identity: the playlist dedups on it and
/// the saved-playlist file stores it verbatim. `display` is what the list
/// shows (the file name with its extension stripped); tag metadata is kept
/// separately for the now-playing line and never affects identity.
#[derive(Clone, Debug)]
pub struct Track {
    pub path: PathBuf,
    pub display: String,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
}

impl Track {
    /// Build a `Track` for `path`, absolutizing it and reading what tag
    /// metadata is available. Files with no readable tags still produce a
    /// usable track; the file stem stands in for the title.
    pub fn from_path(path: &Path) -> Self {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

        let display = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();

        let mut title = display.clone();
        let mut artist: Option<String> = None;
        let mut album: Option<String> = None;
        let mut duration: Option<Duration> = None;

        if let Ok(tagged) = lofty::read_from_path(&path) {
            duration = Some(tagged.properties().duration());

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.get_string(lofty::tag::ItemKey::TrackTitle) {
                    if !v.trim().is_empty() {
                        title = v.trim().to_string();
                    }
                }
                if let Some(v) = tag.get_string(lofty::tag::ItemKey::TrackArtist) {
                    let v = v.trim();
                    if !v.is_empty() {
                        artist = Some(v.to_string());
                    }
                }
                if let Some(v) = tag.get_string(lofty::tag::ItemKey::AlbumTitle) {
                    let v = v.trim();
                    if !v.is_empty() {
                        album = Some(v.to_string());
                    }
                }
            }
        }

        Self {
            path,
            display,
            title,
            artist,
            album,
            duration,
        }
    }

    /// "Artist - Title" when an artist tag exists, otherwise just the title.
    pub fn now_playing_text(&self) -> String {
        match self.artist.as_deref().map(str::trim) {
            Some(a) if !a.is_empty() => format!("{} - {}", a, self.title),
            _ => self.title.clone(),
        }
    }
}
