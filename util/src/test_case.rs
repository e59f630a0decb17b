//! The immutable description of one differential test.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// What the reference program is expected to leave behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedOutput {
    /// A file holding the reference program's output for this test.
    File(PathBuf),
    /// The reference program fails and produces no usable output.
    Error,
}

impl ExpectedOutput {
    /// Marker used by test lists in place of an output path.
    pub const ERROR_SENTINEL: &'static str = "ERROR";

    pub fn from_field(field: &str) -> Self {
        if field == Self::ERROR_SENTINEL {
            ExpectedOutput::Error
        } else {
            ExpectedOutput::File(PathBuf::from(field))
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ExpectedOutput::Error)
    }
}

/// A single test case: the same arguments and input are given to both executables.
///
/// The working file path is appended to `arguments` by the runner, never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub arguments: Vec<String>,
    pub input: PathBuf,
    pub expected_output: ExpectedOutput,
    #[serde(default)]
    pub memory_check: bool,
    #[serde(default)]
    pub large_stack: bool,
}

impl TestCase {
    pub fn new(
        name: impl Into<String>,
        arguments: Vec<String>,
        input: impl Into<PathBuf>,
        expected_output: ExpectedOutput,
    ) -> Self {
        Self {
            name: name.into(),
            arguments,
            input: input.into(),
            expected_output,
            memory_check: false,
            large_stack: false,
        }
    }

    pub fn with_memory_check(mut self, enabled: bool, large_stack: bool) -> Self {
        self.memory_check = enabled;
        self.large_stack = enabled && large_stack;
        self
    }

    /// Arguments as shown in reports: quoted, except the `-d` flag itself.
    pub fn printable_arguments(&self) -> PrintableArgs<'_> {
        PrintableArgs(&self.arguments)
    }
}

pub struct PrintableArgs<'a>(&'a [String]);

impl fmt::Display for PrintableArgs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if arg == "-d" {
                f.write_str(arg)?;
            } else {
                write!(f, "'{}'", arg)?;
            }
        }
        Ok(())
    }
}
