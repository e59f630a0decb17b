use crate::types::Comparison;
use code_runner::outcome::RunOutcome;

/// OutputComparator is a strategy trait for comparing outputs.
///
/// An implementation turns the reference outcome and the candidate outcome of one
/// test into a [`Comparison`] that the report renders.
pub trait OutputComparator: Send + Sync {
    /// - `expected`: the reference outcome (or the one derived from a stored output).
    /// - `actual`: the candidate outcome.
    fn compare(&self, expected: &RunOutcome, actual: &RunOutcome) -> Comparison;
}
