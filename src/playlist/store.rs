//! The saved-playlist file: one absolute path per line, UTF-8,
//! newline-terminated. No escaping or versioning; the format matches what
//! earlier releases wrote, so old files restore as-is.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Read the saved path list. A missing file is an empty playlist, not an
/// error; blank lines are ignored.
pub fn load(path: &Path) -> io::Result<Vec<PathBuf>> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    Ok(text
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .map(PathBuf::from)
        .collect())
}

/// Write `entries` verbatim, one per line. Called once at shutdown; a write
/// failure propagates to the caller.
pub fn save(path: &Path, entries: &[PathBuf]) -> io::Result<()> {
    let mut out = fs::File::create(path)?;
    for entry in entries {
        out.write_all(entry.display().to_string().as_bytes())?;
        out.write_all(b"\n")?;
    }
    out.flush()
}
