use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;

pub(crate) fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

/// Scan the music directory for playable files.
///
/// The directory is created when it does not exist yet (a fresh checkout has
/// no `music/` folder), and only its top level is considered. Matches come
/// back in file-name order so startup is deterministic; the playlist keeps
/// whatever order they are added in.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    if fs::create_dir_all(dir).is_err() {
        return Vec::new();
    }

    let walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .max_depth(1)
        .sort_by_file_name();

    walker
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file() && is_audio_file(e.path(), settings))
        .map(|e| Track::from_path(e.path()))
        .collect()
}
