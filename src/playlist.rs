//! The playlist state machine: ordering, dedup, play-mode transitions and the
//! saved-playlist file. This is the only place that decides what plays next.

mod controller;
pub mod store;

pub use controller::*;

#[cfg(test)]
mod tests;
