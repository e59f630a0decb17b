use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Harness-level faults. Any of these ends the process with exit code 1.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("no candidate executable given (pass it as the first argument or set CANDIDATE_EXECUTABLE)")]
    NoCandidate,

    #[error("cannot read test list {}: {source}", path.display())]
    ReadTests { path: PathBuf, source: io::Error },

    #[error("invalid test list {}: {source}", path.display())]
    ParseTests {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("cannot prepare work directory {}: {source}", path.display())]
    WorkDir { path: PathBuf, source: io::Error },

    #[error("cannot write run report {}: {source}", path.display())]
    WriteReport { path: PathBuf, source: io::Error },

    #[error("run aborted: {0}")]
    Aborted(String),
}
