use marker::Verdict;
use marker::report::{ReportStyle, RunReport, TestEntry, progress_line, summary_line};
use std::io::Write;

use crate::manager::manager::RunSummary;

/// Receives results from the scheduler as they complete.
///
/// Called only from the aggregating task, one call at a time.
pub trait Reporter: Send {
    fn on_verdict(&mut self, verdict: &Verdict);

    /// A test that could not be evaluated at all.
    fn on_error(&mut self, test_name: &str, message: &str);

    fn on_progress(&mut self, _completed: usize, _total: usize) {}
}

/// Writes report fragments, progress lines and the summary to a terminal-like sink.
///
/// Failures are always printed; passes only in verbose mode. Every result is
/// also recorded into a [`RunReport`] for the optional JSON summary.
pub struct ConsoleReporter<W: Write + Send> {
    out: W,
    verbose: bool,
    progress_every: usize,
    style: ReportStyle,
    report: RunReport,
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(out: W, total: usize, verbose: bool, mem_check: bool, style: ReportStyle) -> Self {
        Self {
            out,
            verbose,
            progress_every: if mem_check { 5 } else { 20 },
            style,
            report: RunReport::new(total),
        }
    }

    /// Prints the summary line and hands back the sink and the recorded report.
    pub fn finish(mut self, summary: &RunSummary) -> (W, RunReport) {
        if summary.interrupted {
            self.write(&format!(
                "Interrupted after {} of {} tests.\n",
                summary.completed, summary.total
            ));
        }
        if let Some(reason) = &summary.aborted {
            self.write(&format!("Aborted: {}\n", reason));
        }
        let line = summary_line(summary.passed, summary.total, self.style);
        self.write(&format!("{}\n", line));

        self.report.interrupted = summary.interrupted;
        self.report.aborted = summary.aborted.clone();
        (self.out, self.report)
    }

    fn write(&mut self, text: &str) {
        if let Err(err) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write report output: {}", err);
        }
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn on_verdict(&mut self, verdict: &Verdict) {
        if !verdict.passed() || self.verbose {
            self.write(verdict.report());
        }
        self.report.record(TestEntry::from(verdict));
    }

    fn on_error(&mut self, test_name: &str, message: &str) {
        self.write(&format!("[ er ] test: {}\n{}\n", test_name, message));
        self.report.record(TestEntry::errored(test_name, message));
    }

    fn on_progress(&mut self, completed: usize, total: usize) {
        if completed % self.progress_every == 0 {
            let line = progress_line(completed, total);
            self.write(&format!("{}\n", line));
        }
    }
}
