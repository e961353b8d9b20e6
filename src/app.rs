//! Application module: exposes the presentation-side model used by the TUI
//! and runtime.
//!
//! Canonical playback state lives in `playlist::PlaylistController`; the
//! `App` model adds only view concerns (cursor, filter, prompts, status
//! text) on top of it.

mod model;

pub use model::*;
