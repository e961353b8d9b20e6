use super::model::Track;
use super::scan::{is_audio_file, scan};
use crate::config::LibrarySettings;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn is_audio_file_matches_configured_extensions_case_insensitive() {
    let settings = LibrarySettings::default();
    assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
    assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
    assert!(is_audio_file(Path::new("/tmp/a.wav"), &settings));
    assert!(is_audio_file(Path::new("/tmp/a.WaV"), &settings));
    assert!(!is_audio_file(Path::new("/tmp/a.flac"), &settings));
    assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
    assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
}

#[test]
fn track_display_strips_the_extension() {
    let t = Track::from_path(Path::new("/tmp/does-not-exist/My Song.mp3"));
    assert_eq!(t.display, "My Song");
    // No readable tags: title falls back to the stem.
    assert_eq!(t.title, "My Song");
    assert!(t.path.is_absolute());
}

#[test]
fn now_playing_text_prefers_artist_dash_title() {
    let mut t = Track::from_path(Path::new("/tmp/Song.mp3"));
    assert_eq!(t.now_playing_text(), "Song");
    t.artist = Some("Artist".to_string());
    assert_eq!(t.now_playing_text(), "Artist - Song");
    t.artist = Some("   ".to_string());
    assert_eq!(t.now_playing_text(), "Song");
}

#[test]
fn scan_filters_non_audio_and_sorts_by_file_name() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("a.wav"), b"not a real wav").unwrap();
    fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

    let tracks = scan(dir.path(), &LibrarySettings::default());
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].display, "a");
    assert_eq!(tracks[1].display, "b");
}

#[test]
fn scan_does_not_recurse_into_subdirectories() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("child.mp3"), b"not real").unwrap();

    let tracks = scan(dir.path(), &LibrarySettings::default());
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].display, "root");
}

#[test]
fn scan_creates_a_missing_music_directory() {
    let dir = tempdir().unwrap();
    let music = dir.path().join("music");
    assert!(!music.exists());

    let tracks = scan(&music, &LibrarySettings::default());
    assert!(tracks.is_empty());
    assert!(music.is_dir());
}
