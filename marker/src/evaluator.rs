//! # Evaluator
//!
//! Turns one [`TestCase`] into a [`Verdict`]: obtain the reference outcome, run the
//! candidate, optionally run the memory check, compare and render.

use crate::comparators::exact_comparator::ExactComparator;
use crate::error::MarkerError;
use crate::report::{ReportStyle, render_fragment};
use crate::traits::comparator::OutputComparator;
use crate::types::Verdict;
use code_runner::outcome::{MemorySafetyResult, RunOutcome};
use std::path::{Path, PathBuf};
use util::execution_config::ExecutionConfig;
use util::paths::resolve_executable;
use util::test_case::{ExpectedOutput, TestCase};

/// Where the expected behaviour of a test comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceSource {
    /// Run the trusted reference executable on every test.
    Executable(PathBuf),
    /// Use the stored expected outputs in the test list instead.
    ExpectedOutputs,
}

impl ReferenceSource {
    pub fn from_option(executable: Option<PathBuf>) -> Self {
        match executable {
            Some(path) => ReferenceSource::Executable(resolve_executable(path)),
            None => ReferenceSource::ExpectedOutputs,
        }
    }
}

/// Evaluates test cases for one candidate executable.
///
/// An `Evaluator` holds no per-test state, so one instance can be shared by
/// every concurrent evaluation.
pub struct Evaluator {
    candidate: PathBuf,
    reference: ReferenceSource,
    config: ExecutionConfig,
    comparator: Box<dyn OutputComparator>,
    style: ReportStyle,
}

impl Evaluator {
    pub fn new(
        candidate: impl AsRef<Path>,
        reference: ReferenceSource,
        config: ExecutionConfig,
    ) -> Self {
        Self {
            candidate: resolve_executable(candidate),
            reference,
            config,
            comparator: Box::new(ExactComparator),
            style: ReportStyle::plain(),
        }
    }

    /// Replaces the default [`ExactComparator`]. Its decision drives both the
    /// verdict and the rendered report.
    pub fn with_comparator<C: OutputComparator + 'static>(mut self, comparator: C) -> Self {
        self.comparator = Box::new(comparator);
        self
    }

    pub fn with_style(mut self, style: ReportStyle) -> Self {
        self.style = style;
        self
    }

    pub fn candidate(&self) -> &Path {
        &self.candidate
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Runs one test case to a verdict.
    ///
    /// Misbehaviour of either program is part of the verdict. Only harness
    /// faults are returned as errors; see [`MarkerError::is_fatal`].
    #[tracing::instrument(name = "evaluate", skip_all, fields(test = %case.name))]
    pub async fn evaluate(&self, case: &TestCase) -> Result<Verdict, MarkerError> {
        let reference = self.reference_outcome(case).await?;
        let candidate =
            code_runner::run(&self.candidate, &case.arguments, &case.input, &self.config).await?;

        let memory = if case.memory_check {
            code_runner::check(
                &self.candidate,
                &case.arguments,
                &case.input,
                case.large_stack,
                &self.config,
            )
            .await
        } else {
            MemorySafetyResult::Clean
        };

        let comparison = self.comparator.compare(&reference, &candidate);
        let passed = Verdict::passes(comparison.matched, &memory);
        let report = render_fragment(case, passed, &comparison, &memory, self.style);

        tracing::debug!(
            passed,
            reference = reference.kind(),
            candidate = candidate.kind(),
            "Evaluated"
        );

        Ok(Verdict::new(
            case.name.clone(),
            reference,
            candidate,
            memory,
            comparison.matched,
            report,
        ))
    }

    async fn reference_outcome(&self, case: &TestCase) -> Result<RunOutcome, MarkerError> {
        match &self.reference {
            ReferenceSource::Executable(executable) => {
                let outcome =
                    code_runner::run(executable, &case.arguments, &case.input, &self.config)
                        .await?;
                warn_if_stale(case, &outcome).await;
                Ok(outcome)
            }
            ReferenceSource::ExpectedOutputs => match &case.expected_output {
                ExpectedOutput::Error => Ok(RunOutcome::NonZeroExit),
                ExpectedOutput::File(path) => {
                    let bytes = tokio::fs::read(path).await.map_err(|source| {
                        MarkerError::ExpectedOutput {
                            path: path.clone(),
                            source,
                        }
                    })?;
                    Ok(RunOutcome::from_artifact(bytes))
                }
            },
        }
    }
}

/// Logs when a stored expected output disagrees with what the reference just did.
async fn warn_if_stale(case: &TestCase, reference: &RunOutcome) {
    match (&case.expected_output, reference) {
        (ExpectedOutput::Error, RunOutcome::Success(_)) => {
            tracing::warn!(test = %case.name, "Expected an error but the reference succeeded");
        }
        (ExpectedOutput::File(path), RunOutcome::Success(text)) => {
            match tokio::fs::read(path).await {
                Ok(stored) if stored != text.as_bytes() => {
                    tracing::warn!(
                        test = %case.name,
                        path = %path.display(),
                        "Stored expected output differs from the reference"
                    );
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!(path = %path.display(), "No stored output to cross-check: {}", err);
                }
            }
        }
        _ => {}
    }
}
