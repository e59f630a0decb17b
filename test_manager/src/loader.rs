//! Test list loading.
//!
//! A test list is a JSON array of entries:
//!
//! ```json
//! [
//!   { "name": "basic", "cmds": "1p", "input": "in/basic.txt", "output": "out/basic.txt" },
//!   { "name": "bad", "cmds": "x", "delim": ":", "input": "in/basic.txt", "output": "ERROR" }
//! ]
//! ```
//!
//! `input` and `output` are resolved against the directory holding the list.

use crate::error::ManagerError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use util::paths::resolve_against;
use util::test_case::{ExpectedOutput, TestCase};

/// One entry of the test list as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct TestDefinition {
    pub name: String,
    pub cmds: String,
    #[serde(default)]
    pub delim: Option<String>,
    pub input: String,
    pub output: String,
}

impl TestDefinition {
    /// `cmds` becomes the single command argument, preceded by `-d <delim>` when a
    /// non-empty delimiter is set.
    pub fn arguments(&self) -> Vec<String> {
        match &self.delim {
            Some(delim) if !delim.is_empty() => {
                vec!["-d".to_string(), delim.clone(), self.cmds.clone()]
            }
            _ => vec![self.cmds.clone()],
        }
    }

    pub fn into_test_case(self, base: &Path, mem_check: bool, max_stack: bool) -> TestCase {
        let arguments = self.arguments();
        let expected = match ExpectedOutput::from_field(&self.output) {
            ExpectedOutput::File(path) => ExpectedOutput::File(resolve_against(base, path)),
            ExpectedOutput::Error => ExpectedOutput::Error,
        };
        TestCase::new(
            self.name,
            arguments,
            resolve_against(base, &self.input),
            expected,
        )
        .with_memory_check(mem_check, max_stack)
    }
}

/// Reads the test list at `path` and turns every entry into a [`TestCase`].
///
/// # Errors
/// - [`ManagerError::ReadTests`] if the file cannot be read.
/// - [`ManagerError::ParseTests`] if it is not a valid list of entries.
pub fn load_tests<P: AsRef<Path>>(
    path: P,
    mem_check: bool,
    max_stack: bool,
) -> Result<Vec<TestCase>, ManagerError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ManagerError::ReadTests {
        path: path.to_path_buf(),
        source,
    })?;

    let definitions: Vec<TestDefinition> =
        serde_json::from_str(&content).map_err(|source| ManagerError::ParseTests {
            path: path.to_path_buf(),
            source,
        })?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let cases: Vec<TestCase> = definitions
        .into_iter()
        .map(|def| def.into_test_case(base, mem_check, max_stack))
        .collect();

    tracing::info!(count = cases.len(), path = %path.display(), "Loaded test list");
    Ok(cases)
}
