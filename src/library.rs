//! Track model and music-directory scanning.

mod model;
mod scan;

pub use model::*;
pub use scan::scan;
pub(crate) use scan::is_audio_file;

#[cfg(test)]
mod tests;
