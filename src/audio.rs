//! Playback: a single rodio sink owned by a dedicated thread, driven over an
//! mpsc command channel. At most one sink is ever live; loading a new track
//! always stops and drops the previous one first.

mod player;
mod sink;
mod thread;
mod types;

pub use player::*;
pub use types::*;

#[cfg(test)]
mod tests;
