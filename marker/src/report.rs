//! # Report Module
//!
//! Rendering of per-test report fragments, the final summary line, and the
//! serializable [`RunReport`] written at the end of a run.
//!
//! ## Fragment layout
//!
//! ```text
//! ----------------------
//! [ er ] test: basic
//!
//! input: tests/basic.txt
//! args:  'insert' 'k' 'v'
//!
//! expected:
//! a
//! EOF
//!
//! received:
//! a
//! b
//! EOF
//! ```
//!
//! When both outcomes are equal the expected block is headed `expected = received:`
//! and no received block follows. A memory-safety violation appends a `valgrind:`
//! block with the tool's diagnostic.
//!
//! ## Design Notes
//!
//! - Colour is decided once by the caller and passed in as a [`ReportStyle`]; rendering
//!   never looks at the terminal or the environment itself.
//! - [`RunReport`] is meant for machines; it carries outcome kinds rather than
//!   rendered text.

use crate::types::{Comparison, Verdict};
use chrono::Utc;
use code_runner::outcome::MemorySafetyResult;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::fmt::Write;
use util::test_case::TestCase;
use util::valgrind_report::ValgrindSummary;

const SEPARATOR: &str = "----------------------";

/// Whether rendered text carries ANSI colour codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportStyle {
    ansi: bool,
}

impl ReportStyle {
    pub fn new(ansi: bool) -> Self {
        Self { ansi }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn ansi(&self) -> bool {
        self.ansi
    }

    fn paint(&self, text: &str, colour: impl Fn(&str) -> ColoredString) -> String {
        if self.ansi {
            colour(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn separator(&self) -> String {
        self.paint(SEPARATOR, |s| s.blue().bold())
    }

    fn status(&self, passed: bool) -> String {
        if passed {
            self.paint("ok", |s| s.bright_green().bold())
        } else {
            self.paint("er", |s| s.bright_red().bold())
        }
    }

    fn label(&self, text: &str) -> String {
        self.paint(text, |s| s.yellow())
    }

    fn eof(&self) -> String {
        self.paint("EOF", |s| s.bright_yellow().bold())
    }
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self::plain()
    }
}

/// Renders the fragment for one test.
///
/// `comparison.received` decides whether a received block is shown, so equal
/// outcomes are printed once.
pub fn render_fragment(
    case: &TestCase,
    passed: bool,
    comparison: &Comparison,
    memory: &MemorySafetyResult,
    style: ReportStyle,
) -> String {
    let mut out = String::new();

    // Writing to a String never fails.
    let _ = writeln!(out, "{}", style.separator());
    let _ = writeln!(out, "[ {} ] test: {}", style.status(passed), case.name);
    out.push('\n');
    let _ = writeln!(out, "input: {}", case.input.display());
    let _ = writeln!(out, "args:  {}", case.printable_arguments());
    out.push('\n');

    let heading = if comparison.received.is_none() {
        "expected = received:"
    } else {
        "expected:"
    };
    let _ = writeln!(out, "{}", style.label(heading));
    out.push_str(&comparison.expected);
    let _ = writeln!(out, "{}", style.eof());

    if let Some(received) = &comparison.received {
        out.push('\n');
        let _ = writeln!(out, "{}", style.label("received:"));
        out.push_str(received);
        let _ = writeln!(out, "{}", style.eof());
        if let Some(line) = comparison.first_mismatch_line {
            let _ = writeln!(out, "first difference at line {}", line);
        }
    }

    if let MemorySafetyResult::Violation(diagnostic) = memory {
        out.push('\n');
        match memory.summary().and_then(|s| s.headline()) {
            Some(headline) => {
                let _ = writeln!(out, "{} ({})", style.label("valgrind:"), headline);
            }
            None => {
                let _ = writeln!(out, "{}", style.label("valgrind:"));
            }
        }
        out.push_str(diagnostic);
    }

    out
}

/// `Passed X tests out of Y.` followed by the celebratory or consoling suffix.
pub fn summary_line(passed: usize, total: usize, style: ReportStyle) -> String {
    let suffix = if passed == total {
        style.paint("That's 100%!!", |s| s.bright_green().bold())
    } else {
        style.paint("rip", |s| s.bright_red().bold())
    };
    format!("Passed {} tests out of {}. {}", passed, total, suffix)
}

pub fn progress_line(completed: usize, total: usize) -> String {
    format!("Ran test {} of {}", completed, total)
}

/// One test as recorded in the run report.
#[derive(Debug, Clone, Serialize)]
pub struct TestEntry {
    pub name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leak: Option<ValgrindSummary>,
    /// Set when the test could not be evaluated at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestEntry {
    pub fn errored(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            reference: None,
            candidate: None,
            memory: None,
            leak: None,
            error: Some(error.into()),
        }
    }
}

impl From<&Verdict> for TestEntry {
    fn from(verdict: &Verdict) -> Self {
        let memory = if verdict.memory().is_clean() {
            "clean"
        } else {
            "violation"
        };
        Self {
            name: verdict.test_name().to_string(),
            passed: verdict.passed(),
            reference: Some(verdict.reference().kind()),
            candidate: Some(verdict.candidate().kind()),
            memory: Some(memory),
            leak: verdict.memory().summary(),
            error: None,
        }
    }
}

/// Machine-readable record of a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: String,
    pub passed: usize,
    pub completed: usize,
    pub total: usize,
    pub interrupted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
    pub tests: Vec<TestEntry>,
}

impl RunReport {
    pub fn new(total: usize) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            passed: 0,
            completed: 0,
            total,
            interrupted: false,
            aborted: None,
            tests: Vec::new(),
        }
    }

    pub fn record(&mut self, entry: TestEntry) {
        self.completed += 1;
        if entry.passed {
            self.passed += 1;
        }
        self.tests.push(entry);
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparators::exact_comparator::ExactComparator;
    use crate::traits::comparator::OutputComparator;
    use code_runner::outcome::RunOutcome;
    use util::test_case::ExpectedOutput;

    fn case() -> TestCase {
        TestCase::new(
            "basic",
            vec!["insert".into(), "k".into()],
            "tests/basic.txt",
            ExpectedOutput::File("out/basic.txt".into()),
        )
    }

    #[test]
    fn test_passing_fragment_shows_single_block() {
        let outcome = RunOutcome::Success("a\n".into());
        let comparison = ExactComparator.compare(&outcome, &outcome);
        let text = render_fragment(
            &case(),
            true,
            &comparison,
            &MemorySafetyResult::Clean,
            ReportStyle::plain(),
        );
        assert_eq!(
            text,
            "----------------------\n[ ok ] test: basic\n\ninput: tests/basic.txt\nargs:  'insert' 'k'\n\nexpected = received:\na\nEOF\n"
        );
    }

    #[test]
    fn test_failing_fragment_shows_both_blocks() {
        let comparison = ExactComparator.compare(
            &RunOutcome::Success("a\n".into()),
            &RunOutcome::Success("a\nb\n".into()),
        );
        let text = render_fragment(
            &case(),
            false,
            &comparison,
            &MemorySafetyResult::Clean,
            ReportStyle::plain(),
        );
        assert!(text.contains("[ er ] test: basic"));
        assert!(text.contains("expected:\na\nEOF\n"));
        assert!(text.contains("\nreceived:\na\nb\nEOF\n"));
        assert!(text.contains("first difference at line 2"));
        assert!(!text.contains("expected = received"));
    }

    #[test]
    fn test_violation_appends_valgrind_block() {
        let outcome = RunOutcome::Success("a\n".into());
        let comparison = ExactComparator.compare(&outcome, &outcome);
        let log = "==1== ERROR SUMMARY: 2 errors from 2 contexts\n";
        let text = render_fragment(
            &case(),
            false,
            &comparison,
            &MemorySafetyResult::Violation(log.into()),
            ReportStyle::plain(),
        );
        assert!(text.contains("[ er ]"));
        assert!(text.ends_with(&format!("\nvalgrind: (2 errors)\n{}", log)));
    }

    #[test]
    fn test_error_outcome_shows_diagnostic() {
        let comparison =
            ExactComparator.compare(&RunOutcome::NonZeroExit, &RunOutcome::NonZeroExit);
        let text = render_fragment(
            &case(),
            true,
            &comparison,
            &MemorySafetyResult::Clean,
            ReportStyle::plain(),
        );
        assert!(text.ends_with("expected = received:\nERROR\nEOF\n"));
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            summary_line(3, 3, ReportStyle::plain()),
            "Passed 3 tests out of 3. That's 100%!!"
        );
        assert_eq!(
            summary_line(2, 3, ReportStyle::plain()),
            "Passed 2 tests out of 3. rip"
        );
    }

    #[test]
    fn test_run_report_counts_and_serializes() {
        let mut report = RunReport::new(2);
        let verdict = Verdict::new(
            "ok",
            RunOutcome::Success("a".into()),
            RunOutcome::Success("a".into()),
            MemorySafetyResult::Clean,
            true,
            String::new(),
        );
        report.record(TestEntry::from(&verdict));
        report.record(TestEntry::errored("broken", "expected output missing"));

        assert_eq!(report.passed, 1);
        assert_eq!(report.completed, 2);

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["tests"][0]["candidate"], "success");
        assert_eq!(value["tests"][0]["memory"], "clean");
        assert_eq!(value["tests"][1]["error"], "expected output missing");
        assert!(value["tests"][1].get("candidate").is_none());
        assert!(value["generated_at"].is_string());
    }
}
