//! # Code Runner
//!
//! Launches programs against private copies of a test input and classifies how
//! they ended.
//!
//! - [`process::run`]: one timed execution, classified as a [`outcome::RunOutcome`].
//! - [`memcheck::check`]: an independent execution under valgrind, classified as a
//!   [`outcome::MemorySafetyResult`].
//!
//! Both work on uniquely named working files that are removed when the call
//! returns or is cancelled, and both kill their child process if dropped.

pub mod error;
pub mod memcheck;
pub mod outcome;
pub mod process;
pub mod working_file;

pub use memcheck::check;
pub use process::run;
