use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the harness itself while running a program.
///
/// A misbehaving program is never an error: crashes, timeouts and bad output are
/// classified as a [`RunOutcome`](crate::outcome::RunOutcome).
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The executable is missing or cannot be executed. Aborts the whole run.
    #[error("failed to launch {}: {source}", executable.display())]
    Launch {
        executable: PathBuf,
        source: io::Error,
    },

    /// Creating, copying or reading a working file failed.
    #[error("working file {}: {source}", path.display())]
    WorkingFile { path: PathBuf, source: io::Error },

    #[error("lost track of {}: {source}", executable.display())]
    Wait {
        executable: PathBuf,
        source: io::Error,
    },
}

impl RunnerError {
    /// Fatal errors stop every remaining test; the rest only fail the current one.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RunnerError::Launch { .. })
    }
}
