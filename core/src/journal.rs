//! Append-only line journals: the error log and the response log.
//!
//! The file is opened, appended to and closed for every entry, so nothing
//! is held open across rows and a crash never loses earlier lines.
//! Write failures are reported through the logger and never abort a run.

use std::{
    fmt::Display,
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Default)]
pub struct AppendLog {
    path: Option<PathBuf>,
}

impl AppendLog {
    /// An empty path disables the journal.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            path: (!path.as_os_str().is_empty()).then(|| path.to_path_buf()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Append `entry` followed by a newline.
    pub fn append(&self, entry: &dyn Display) {
        let Some(path) = &self.path else {
            return;
        };
        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| writeln!(file, "{entry}"));
        if let Err(e) = written {
            log::warn!("Cannot write to {}: {e}", path.display());
        }
    }
}
