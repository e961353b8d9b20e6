use super::*;
use crate::library::Track;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn t(path: &str) -> Track {
    let path = PathBuf::from(path);
    let display = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    Track {
        path,
        display: display.clone(),
        title: display,
        artist: None,
        album: None,
        duration: None,
    }
}

fn abc() -> PlaylistController {
    let mut c = PlaylistController::new();
    c.add(t("/music/A.mp3"));
    c.add(t("/music/B.mp3"));
    c.add(t("/music/C.mp3"));
    c
}

#[test]
fn add_dedups_on_path_regardless_of_order() {
    let mut c = PlaylistController::new();
    assert!(c.add(t("/music/X.mp3")));
    assert!(c.add(t("/music/Y.mp3")));
    assert!(!c.add(t("/music/X.mp3")));
    assert!(!c.add(t("/music/Y.mp3")));
    assert!(!c.add(t("/music/X.mp3")));
    assert_eq!(c.len(), 2);
    assert_eq!(c.tracks()[0].display, "X");
    assert_eq!(c.tracks()[1].display, "Y");
}

#[test]
fn duplicate_add_grows_the_list_by_exactly_one() {
    let mut c = PlaylistController::new();
    c.add(t("/music/X.mp3"));
    let before = c.len();
    c.add(t("/music/X.mp3"));
    assert_eq!(c.len(), before);
    assert_eq!(c.len(), 1);
}

#[test]
fn mode_cycles_in_fixed_order() {
    let mut c = PlaylistController::new();
    assert_eq!(c.mode(), PlayMode::LoopAll);
    assert_eq!(c.cycle_mode(), PlayMode::Shuffle);
    assert_eq!(c.cycle_mode(), PlayMode::LoopOne);
    assert_eq!(c.cycle_mode(), PlayMode::LoopAll);
}

#[test]
fn loop_all_forward_visits_every_index_once_per_cycle() {
    let mut c = abc();
    c.select_index(1);

    let mut seen = Vec::new();
    for _ in 0..c.len() {
        c.advance(Direction::Forward);
        seen.push(c.current_index().unwrap());
    }
    seen.sort_unstable();
    assert_eq!(seen, vec![0, 1, 2]);
    // One full cycle returns to the start.
    assert_eq!(c.current_index(), Some(1));
}

#[test]
fn loop_all_wraps_both_ways() {
    let mut c = abc();
    c.select_index(2);
    c.advance(Direction::Forward);
    assert_eq!(c.current_index(), Some(0));

    c.select_index(0);
    c.advance(Direction::Backward);
    assert_eq!(c.current_index(), Some(2));
}

#[test]
fn loop_one_forward_replays_the_same_index() {
    let mut c = abc();
    c.cycle_mode();
    c.cycle_mode();
    assert_eq!(c.mode(), PlayMode::LoopOne);

    c.select_index(1);
    for _ in 0..5 {
        c.advance(Direction::Forward);
        assert_eq!(c.current_index(), Some(1));
    }
}

#[test]
fn loop_one_backward_steps_to_the_circular_previous() {
    let mut c = abc();
    c.cycle_mode();
    c.cycle_mode();
    c.select_index(0);
    c.advance(Direction::Backward);
    assert_eq!(c.current_index(), Some(2));
}

#[test]
fn shuffle_forward_never_repeats_when_there_is_a_choice() {
    let mut c = abc();
    c.cycle_mode();
    assert_eq!(c.mode(), PlayMode::Shuffle);
    c.select_index(1);

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let before = c.current_index().unwrap();
        c.advance_with(Direction::Forward, &mut rng);
        let after = c.current_index().unwrap();
        assert_ne!(before, after);
        assert!(after < c.len());
    }
}

#[test]
fn shuffle_forward_with_one_track_replays_it() {
    let mut c = PlaylistController::new();
    c.add(t("/music/only.mp3"));
    c.cycle_mode();
    c.select_index(0);

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..10 {
        c.advance_with(Direction::Forward, &mut rng);
        assert_eq!(c.current_index(), Some(0));
    }
}

#[test]
fn shuffle_backward_draws_any_valid_index() {
    let mut c = abc();
    c.cycle_mode();
    c.select_index(0);

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        c.advance_with(Direction::Backward, &mut rng);
        assert!(c.current_index().unwrap() < c.len());
    }
}

#[test]
fn advance_on_empty_playlist_is_a_noop() {
    let mut c = PlaylistController::new();
    assert!(c.advance(Direction::Forward).is_none());
    assert!(c.advance(Direction::Backward).is_none());
    assert!(c.current_index().is_none());
}

#[test]
fn advance_before_anything_played_starts_at_the_list_ends() {
    let mut c = abc();
    assert_eq!(c.advance(Direction::Forward).unwrap().display, "A");

    let mut c = abc();
    assert_eq!(c.advance(Direction::Backward).unwrap().display, "C");
}

#[test]
fn select_path_resolves_identity_not_row_number() {
    let mut c = abc();
    let picked = c.select_path(Path::new("/music/B.mp3")).unwrap();
    assert_eq!(picked.display, "B");
    assert_eq!(c.current_index(), Some(1));

    assert!(c.select_path(Path::new("/music/nope.mp3")).is_none());
    // Failed selection leaves the cursor alone.
    assert_eq!(c.current_index(), Some(1));
}

#[test]
fn select_index_out_of_range_is_a_noop() {
    let mut c = abc();
    assert!(c.select_index(3).is_none());
    assert!(c.current_index().is_none());
}

#[test]
fn removing_the_current_track_goes_idle_without_advancing() {
    let mut c = abc();
    c.select_path(Path::new("/music/B.mp3"));

    let removed = c.remove_path(Path::new("/music/B.mp3")).unwrap();
    assert!(removed.was_current);
    assert_eq!(removed.track.display, "B");
    assert!(c.current_index().is_none());
    assert!(c.current().is_none());
    assert_eq!(c.len(), 2);
}

#[test]
fn removing_an_earlier_track_keeps_the_cursor_on_the_same_track() {
    let mut c = abc();
    c.select_path(Path::new("/music/C.mp3"));

    let removed = c.remove_path(Path::new("/music/A.mp3")).unwrap();
    assert!(!removed.was_current);
    assert_eq!(c.current().unwrap().display, "C");
    assert_eq!(c.current_index(), Some(1));
}

#[test]
fn remove_of_unknown_path_is_a_noop() {
    let mut c = abc();
    assert!(c.remove_path(Path::new("/music/zzz.mp3")).is_none());
    assert_eq!(c.len(), 3);
}

#[test]
fn load_persisted_skips_missing_files_and_keeps_order() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.mp3");
    let b = dir.path().join("b.mp3");
    fs::write(&a, b"x").unwrap();
    fs::write(&b, b"x").unwrap();
    let ghost = dir.path().join("gone.mp3");

    let mut c = PlaylistController::new();
    let added = c.load_persisted(&[b.clone(), ghost, a.clone()]);
    assert_eq!(added, 2);
    assert_eq!(c.len(), 2);
    assert_eq!(c.tracks()[0].display, "b");
    assert_eq!(c.tracks()[1].display, "a");
}

#[test]
fn snapshot_then_load_reproduces_the_playlist() {
    let dir = tempdir().unwrap();
    let names = ["one.mp3", "two.mp3", "three.mp3"];
    let mut c = PlaylistController::new();
    for n in names {
        let p = dir.path().join(n);
        fs::write(&p, b"x").unwrap();
        c.add_path(&p);
    }

    let file = dir.path().join("playlist.txt");
    store::save(&file, &c.snapshot()).unwrap();

    let mut restored = PlaylistController::new();
    restored.load_persisted(&store::load(&file).unwrap());

    assert_eq!(restored.snapshot(), c.snapshot());
}

#[test]
fn store_load_of_missing_file_is_an_empty_playlist() {
    let dir = tempdir().unwrap();
    let entries = store::load(&dir.path().join("nope.txt")).unwrap();
    assert!(entries.is_empty());
}

#[test]
fn store_writes_one_newline_terminated_path_per_line() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("playlist.txt");
    store::save(
        &file,
        &[PathBuf::from("/music/a.mp3"), PathBuf::from("/music/b é.wav")],
    )
    .unwrap();

    let text = fs::read_to_string(&file).unwrap();
    assert_eq!(text, "/music/a.mp3\n/music/b é.wav\n");

    let back = store::load(&file).unwrap();
    assert_eq!(back, vec![PathBuf::from("/music/a.mp3"), PathBuf::from("/music/b é.wav")]);
}
