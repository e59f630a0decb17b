//! A comparator that requires the candidate to reproduce the reference exactly.
//!
//! No whitespace or line-ending normalisation is applied: the reference output is
//! the ground truth and cosmetic drift counts as a failure.

use crate::traits::comparator::OutputComparator;
use crate::types::Comparison;
use code_runner::outcome::RunOutcome;

/// Matches when both outcomes are the same variant and, for successful runs, the
/// artifact bytes are identical.
pub struct ExactComparator;

impl OutputComparator for ExactComparator {
    fn compare(&self, expected: &RunOutcome, actual: &RunOutcome) -> Comparison {
        let matched = expected == actual;

        let first_mismatch_line = match (expected, actual) {
            (RunOutcome::Success(e), RunOutcome::Success(a)) if !matched => {
                first_mismatched_line(e, a)
            }
            _ => None,
        };

        Comparison {
            matched,
            expected: expected.text().to_string(),
            received: (!matched).then(|| actual.text().to_string()),
            first_mismatch_line,
        }
    }
}

/// 1-based number of the first line that differs, line terminators included.
fn first_mismatched_line(expected: &str, actual: &str) -> Option<usize> {
    let mut expected_lines = expected.split_inclusive('\n');
    let mut actual_lines = actual.split_inclusive('\n');
    let mut line = 1;
    loop {
        match (expected_lines.next(), actual_lines.next()) {
            (None, None) => return None,
            (Some(e), Some(a)) if e == a => line += 1,
            _ => return Some(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(text: &str) -> RunOutcome {
        RunOutcome::Success(text.to_string())
    }

    #[test]
    fn test_exact_match() {
        let result = ExactComparator.compare(&success("a\n"), &success("a\n"));
        assert!(result.matched);
        assert_eq!(result.expected, "a\n");
        assert!(result.received.is_none());
        assert!(result.first_mismatch_line.is_none());
    }

    #[test]
    fn test_mismatched_content() {
        let result = ExactComparator.compare(&success("a\n"), &success("a\nb\nc\n"));
        assert!(!result.matched);
        assert_eq!(result.received.as_deref(), Some("a\nb\nc\n"));
        assert_eq!(result.first_mismatch_line, Some(2));
    }

    #[test]
    fn test_trailing_newline_matters() {
        let result = ExactComparator.compare(&success("a\nb\n"), &success("a\nb"));
        assert!(!result.matched);
        assert_eq!(result.first_mismatch_line, Some(2));
    }

    #[test]
    fn test_crlf_is_not_normalised() {
        let result = ExactComparator.compare(&success("x:y\n"), &success("x:y\r\n"));
        assert!(!result.matched);
        assert_eq!(result.first_mismatch_line, Some(1));
    }

    #[test]
    fn test_both_errors_match() {
        let result = ExactComparator.compare(&RunOutcome::NonZeroExit, &RunOutcome::NonZeroExit);
        assert!(result.matched);
        assert_eq!(result.expected, "ERROR\n");
    }

    #[test]
    fn test_different_failure_kinds_do_not_match() {
        let result = ExactComparator.compare(&RunOutcome::NonZeroExit, &RunOutcome::CrashSignal);
        assert!(!result.matched);
        assert_eq!(result.received.as_deref(), Some("SEGFAULT\n"));
        assert!(result.first_mismatch_line.is_none());
    }

    #[test]
    fn test_printed_error_text_is_not_an_error_exit() {
        let result = ExactComparator.compare(&RunOutcome::NonZeroExit, &success("ERROR\n"));
        assert!(!result.matched);
    }

    #[test]
    fn test_empty_outputs_match() {
        assert!(ExactComparator.compare(&success(""), &success("")).matched);
    }
}
