//! # Marker Library
//!
//! Differential evaluation of a candidate executable against a trusted reference.
//!
//! ## Overview
//!
//! For every [`TestCase`](util::test_case::TestCase) the marker:
//!
//! 1. Obtains the reference outcome, either by running the reference executable or
//!    from the stored expected output ([`evaluator::ReferenceSource`]).
//! 2. Runs the candidate on its own copy of the same input.
//! 3. Runs the candidate again under the memory checker when the case asks for it.
//! 4. Compares the outcomes with an [`OutputComparator`](traits::comparator::OutputComparator)
//!    and renders a report fragment.
//!
//! The result is an immutable [`Verdict`](types::Verdict).
//!
//! ## Example
//!
//! ```rust,no_run
//! use marker::evaluator::{Evaluator, ReferenceSource};
//! use util::execution_config::ExecutionConfig;
//! use util::test_case::{ExpectedOutput, TestCase};
//!
//! # async fn demo() -> Result<(), marker::error::MarkerError> {
//! let evaluator = Evaluator::new(
//!     "./candidate",
//!     ReferenceSource::Executable("./reference".into()),
//!     ExecutionConfig::default(),
//! );
//! let case = TestCase::new("basic", vec![], "tests/basic.txt", ExpectedOutput::Error);
//! let verdict = evaluator.evaluate(&case).await?;
//! print!("{}", verdict.report());
//! # Ok(())
//! # }
//! ```

pub mod comparators;
pub mod error;
pub mod evaluator;
pub mod report;
pub mod traits;
pub mod types;

pub use evaluator::{Evaluator, ReferenceSource};
pub use types::Verdict;
