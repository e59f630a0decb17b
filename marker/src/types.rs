//! # Types Module
//!
//! Result types produced by the marker: the per-test [`Comparison`] and the final
//! [`Verdict`].

use code_runner::outcome::{MemorySafetyResult, RunOutcome};
use serde::Serialize;

/// What a comparator found when comparing the reference and candidate outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub matched: bool,
    /// Reference text, or the reference's diagnostic for non-success outcomes.
    pub expected: String,
    /// Candidate text; only present when the comparator found no match.
    pub received: Option<String>,
    /// 1-based line of the first difference, when both runs produced text.
    pub first_mismatch_line: Option<usize>,
}

/// The final classification of one test case.
///
/// Built once by the evaluator and never modified. `passed` is derived in
/// [`Verdict::new`] from the comparator's decision and the memory check, the same
/// decision the rendered report is based on.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    test_name: String,
    passed: bool,
    reference: RunOutcome,
    candidate: RunOutcome,
    memory: MemorySafetyResult,
    #[serde(skip)]
    report: String,
}

impl Verdict {
    pub fn new(
        test_name: impl Into<String>,
        reference: RunOutcome,
        candidate: RunOutcome,
        memory: MemorySafetyResult,
        matched: bool,
        report: String,
    ) -> Self {
        let passed = Self::passes(matched, &memory);
        Self {
            test_name: test_name.into(),
            passed,
            reference,
            candidate,
            memory,
            report,
        }
    }

    /// The outcomes matched and the memory check found nothing.
    pub fn passes(matched: bool, memory: &MemorySafetyResult) -> bool {
        matched && memory.is_clean()
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn reference(&self) -> &RunOutcome {
        &self.reference
    }

    pub fn candidate(&self) -> &RunOutcome {
        &self.candidate
    }

    pub fn memory(&self) -> &MemorySafetyResult {
        &self.memory
    }

    /// Human-readable fragment for this test.
    pub fn report(&self) -> &str {
        &self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_outcomes_pass() {
        let v = Verdict::new(
            "basic",
            RunOutcome::Success("a\n".into()),
            RunOutcome::Success("a\n".into()),
            MemorySafetyResult::Clean,
            true,
            String::new(),
        );
        assert!(v.passed());
        assert_eq!(v.test_name(), "basic");
    }

    #[test]
    fn test_memory_violation_flips_matching_run() {
        let v = Verdict::new(
            "leaky",
            RunOutcome::Success("a\n".into()),
            RunOutcome::Success("a\n".into()),
            MemorySafetyResult::Violation("definitely lost: 8 bytes".into()),
            true,
            String::new(),
        );
        assert!(!v.passed());
    }

    #[test]
    fn test_unmatched_outcomes_fail() {
        let v = Verdict::new(
            "printed-error",
            RunOutcome::NonZeroExit,
            RunOutcome::Success("ERROR\n".into()),
            MemorySafetyResult::Clean,
            false,
            String::new(),
        );
        assert!(!v.passed());
    }

    #[test]
    fn test_serializes_outcomes_without_report() {
        let v = Verdict::new(
            "t",
            RunOutcome::TimedOut,
            RunOutcome::TimedOut,
            MemorySafetyResult::Clean,
            true,
            "rendered".into(),
        );
        let value = serde_json::to_value(&v).unwrap();
        assert_eq!(value["test_name"], "t");
        assert_eq!(value["passed"], true);
        assert_eq!(value["candidate"]["outcome"], "timed_out");
        assert_eq!(value["memory"]["status"], "clean");
        assert!(value.get("report").is_none());
    }
}
