use std::path::{Path, PathBuf};

use rand::{Rng, RngExt};

use crate::library::Track;

/// Traversal policy for automatic and manual track changes.
///
/// Cycles in the fixed order LoopAll -> Shuffle -> LoopOne on each toggle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayMode {
    LoopAll,
    Shuffle,
    LoopOne,
}

impl PlayMode {
    pub fn next(self) -> Self {
        match self {
            PlayMode::LoopAll => PlayMode::Shuffle,
            PlayMode::Shuffle => PlayMode::LoopOne,
            PlayMode::LoopOne => PlayMode::LoopAll,
        }
    }
}

impl Default for PlayMode {
    fn default() -> Self {
        Self::LoopAll
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Result of removing a track: the entry itself and whether it was the one
/// currently playing (the caller must stop the media handle in that case).
pub struct Removed {
    pub track: Track,
    pub was_current: bool,
}

/// Owns the ordered track list, the current-track cursor and the play mode.
///
/// The list reflects add order; no two entries ever share a path. The cursor
/// is `None` until something plays, and goes back to `None` when the playing
/// track is removed or playback is stopped.
pub struct PlaylistController {
    tracks: Vec<Track>,
    current: Option<usize>,
    mode: PlayMode,
}

impl PlaylistController {
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            current: None,
            mode: PlayMode::default(),
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Advance the play mode one step in its fixed cycle.
    pub fn cycle_mode(&mut self) -> PlayMode {
        self.mode = self.mode.next();
        self.mode
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// Forget the current track (playback went idle).
    pub fn clear_current(&mut self) {
        self.current = None;
    }

    pub fn position_of(&self, path: &Path) -> Option<usize> {
        let path = absolutize(path);
        self.tracks.iter().position(|t| t.path == path)
    }

    pub fn contains_path(&self, path: &Path) -> bool {
        self.position_of(path).is_some()
    }

    /// Append `track` unless an entry with the same path already exists.
    /// Duplicate adds are silent no-ops.
    pub fn add(&mut self, track: Track) -> bool {
        if self.tracks.iter().any(|t| t.path == track.path) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Build a track from `path` and append it, deduplicating on the
    /// absolute path.
    pub fn add_path(&mut self, path: &Path) -> bool {
        if self.contains_path(path) {
            return false;
        }
        self.add(Track::from_path(path))
    }

    /// Remove the entry for `path`. Keeps the cursor pointing at the same
    /// track when a preceding entry disappears; removing the current track
    /// leaves the cursor at `None` (idle, no auto-advance).
    pub fn remove_path(&mut self, path: &Path) -> Option<Removed> {
        let idx = self.position_of(path)?;
        let track = self.tracks.remove(idx);

        let was_current = self.current == Some(idx);
        self.current = match self.current {
            Some(c) if c == idx => None,
            Some(c) if c > idx => Some(c - 1),
            other => other,
        };

        Some(Removed { track, was_current })
    }

    /// Resolve `path` by identity and make it the current track.
    /// Unknown paths are a no-op.
    pub fn select_path(&mut self, path: &Path) -> Option<&Track> {
        let idx = self.position_of(path)?;
        self.current = Some(idx);
        self.tracks.get(idx)
    }

    /// Make the track at `idx` current. Out-of-range calls are a no-op.
    pub fn select_index(&mut self, idx: usize) -> Option<&Track> {
        if idx >= self.tracks.len() {
            return None;
        }
        self.current = Some(idx);
        self.tracks.get(idx)
    }

    /// Compute and select the next track under the current mode.
    pub fn advance(&mut self, dir: Direction) -> Option<&Track> {
        self.advance_with(dir, &mut rand::rng())
    }

    /// `advance` with an explicit random source (tests pass a seeded one).
    pub fn advance_with(&mut self, dir: Direction, rng: &mut impl Rng) -> Option<&Track> {
        let next = self.step(dir, rng)?;
        self.current = Some(next);
        self.tracks.get(next)
    }

    // The next/previous index computation, per mode:
    //   LoopOne forward replays the current index; backward falls through to
    //   the circular previous (the mode only special-cases end-of-track).
    //   Shuffle forward draws an index that differs from the current one
    //   whenever there is a choice; backward draws fresh with no exclusion.
    //   LoopAll walks circularly in both directions.
    fn step(&self, dir: Direction, rng: &mut impl Rng) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }

        let Some(cur) = self.current else {
            // Nothing has played yet: start at an end of the list.
            return Some(match dir {
                Direction::Forward => 0,
                Direction::Backward => len - 1,
            });
        };

        Some(match (self.mode, dir) {
            (PlayMode::LoopOne, Direction::Forward) => cur,
            (PlayMode::Shuffle, Direction::Forward) => {
                if len == 1 {
                    cur
                } else {
                    loop {
                        let i = rng.random_range(0..len);
                        if i != cur {
                            break i;
                        }
                    }
                }
            }
            (PlayMode::Shuffle, Direction::Backward) => rng.random_range(0..len),
            (_, Direction::Forward) => (cur + 1) % len,
            (_, Direction::Backward) => (cur + len - 1) % len,
        })
    }

    /// Re-add every path that still exists on disk, in the given order.
    /// Missing files are skipped silently. Returns how many were added.
    pub fn load_persisted(&mut self, paths: &[PathBuf]) -> usize {
        let mut added = 0;
        for p in paths {
            if p.exists() && self.add_path(p) {
                added += 1;
            }
        }
        added
    }

    /// The ordered absolute paths of all tracks, for the shutdown write.
    pub fn snapshot(&self) -> Vec<PathBuf> {
        self.tracks.iter().map(|t| t.path.clone()).collect()
    }
}

impl Default for PlaylistController {
    fn default() -> Self {
        Self::new()
    }
}

fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
