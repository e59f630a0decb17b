//! Classification types produced by the runner and the memory checker.

use serde::Serialize;
use std::fmt;
use std::process::ExitStatus;
use util::valgrind_report::ValgrindSummary;

pub const SIGILL: i32 = 4;
pub const SIGSEGV: i32 = 11;

/// How a process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Exited(i32),
    Signaled(i32),
}

impl Termination {
    /// Only faults that point at memory corruption count as crashes.
    pub fn is_crash(&self) -> bool {
        matches!(self, Termination::Signaled(SIGSEGV | SIGILL))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Termination::Exited(0))
    }
}

impl From<ExitStatus> for Termination {
    fn from(status: ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;

        match (status.code(), status.signal()) {
            (Some(code), _) => Termination::Exited(code),
            (None, Some(signal)) => Termination::Signaled(signal),
            (None, None) => Termination::Exited(-1),
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Exited(code) => write!(f, "exit code {}", code),
            Termination::Signaled(signal) => write!(f, "signal {}", signal),
        }
    }
}

/// Result of one execution of a program against a fresh working file.
///
/// Two outcomes are equal only when they are the same variant and, for
/// [`RunOutcome::Success`], the artifact text is byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "output", rename_all = "snake_case")]
pub enum RunOutcome {
    Success(String),
    NonZeroExit,
    CrashSignal,
    TimedOut,
    UndecodableOutput,
}

impl RunOutcome {
    /// Classifies a finished process. `Success` still needs the artifact, so it
    /// is not produced here.
    pub fn from_failed_termination(termination: Termination) -> Option<Self> {
        if termination.is_success() {
            None
        } else if termination.is_crash() {
            Some(RunOutcome::CrashSignal)
        } else {
            Some(RunOutcome::NonZeroExit)
        }
    }

    /// Decodes the artifact left behind by a successful run.
    pub fn from_artifact(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => RunOutcome::Success(text),
            Err(_) => RunOutcome::UndecodableOutput,
        }
    }

    /// The artifact text, or the fixed diagnostic for every other variant.
    pub fn text(&self) -> &str {
        match self {
            RunOutcome::Success(text) => text,
            RunOutcome::NonZeroExit => "ERROR\n",
            RunOutcome::CrashSignal => "SEGFAULT\n",
            RunOutcome::TimedOut => "TIMEOUT\n",
            RunOutcome::UndecodableOutput => "BINARY OUTPUT\n",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RunOutcome::Success(_) => "success",
            RunOutcome::NonZeroExit => "non_zero_exit",
            RunOutcome::CrashSignal => "crash_signal",
            RunOutcome::TimedOut => "timed_out",
            RunOutcome::UndecodableOutput => "undecodable_output",
        }
    }

    pub fn same_kind(&self, other: &RunOutcome) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Verdict of the memory-instrumentation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "diagnostic", rename_all = "snake_case")]
pub enum MemorySafetyResult {
    Clean,
    Violation(String),
}

impl MemorySafetyResult {
    pub fn is_clean(&self) -> bool {
        matches!(self, MemorySafetyResult::Clean)
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            MemorySafetyResult::Clean => None,
            MemorySafetyResult::Violation(text) => Some(text),
        }
    }

    pub fn summary(&self) -> Option<ValgrindSummary> {
        self.diagnostic()
            .map(ValgrindSummary::parse)
            .filter(|summary| !summary.is_empty())
    }
}
