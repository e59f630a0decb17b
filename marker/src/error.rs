//! Marker Error Types
//!
//! [`MarkerError`] covers everything that can stop a single test case from producing
//! a verdict. Misbehaving programs are not errors; they are classified outcomes.
//!
//! # Example
//!
//! ```rust
//! use marker::error::MarkerError;
//! use std::path::PathBuf;
//!
//! let err = MarkerError::ExpectedOutput {
//!     path: PathBuf::from("out/basic.txt"),
//!     source: std::io::Error::from(std::io::ErrorKind::NotFound),
//! };
//! assert!(!err.is_fatal());
//! ```

use code_runner::error::RunnerError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarkerError {
    /// Running the reference or the candidate failed at the harness level.
    #[error(transparent)]
    Runner(#[from] RunnerError),

    /// The stored expected output for a test could not be read.
    #[error("expected output {}: {source}", path.display())]
    ExpectedOutput { path: PathBuf, source: io::Error },
}

impl MarkerError {
    /// Fatal errors mean no other test can succeed either (e.g. a missing executable).
    pub fn is_fatal(&self) -> bool {
        match self {
            MarkerError::Runner(err) => err.is_fatal(),
            MarkerError::ExpectedOutput { .. } => false,
        }
    }
}
