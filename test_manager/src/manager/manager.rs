// manager/manager.rs
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use marker::error::MarkerError;
use marker::{Evaluator, Verdict};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use util::test_case::TestCase;

use crate::manager::reporter::Reporter;

/// Anything that can turn a test case into a verdict.
pub trait CaseEvaluator: Send + Sync + 'static {
    fn evaluate(
        &self,
        case: &TestCase,
    ) -> impl Future<Output = Result<Verdict, MarkerError>> + Send;
}

impl CaseEvaluator for Evaluator {
    fn evaluate(
        &self,
        case: &TestCase,
    ) -> impl Future<Output = Result<Verdict, MarkerError>> + Send {
        Evaluator::evaluate(self, case)
    }
}

/// Aggregate of a run. `completed` counts every test that produced a result,
/// including per-test errors; `passed <= completed <= total`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub completed: usize,
    pub total: usize,
    pub interrupted: bool,
    /// Set when a fatal error stopped the run.
    pub aborted: Option<String>,
}

impl RunSummary {
    fn new(total: usize) -> Self {
        Self {
            passed: 0,
            completed: 0,
            total,
            interrupted: false,
            aborted: None,
        }
    }

    fn record(&mut self, passed: bool) {
        self.completed += 1;
        if passed {
            self.passed += 1;
        }
    }

    fn stopping(&self) -> bool {
        self.interrupted || self.aborted.is_some()
    }
}

/// Runs test cases with at most `max_concurrent` evaluations in flight.
pub struct TestManager<E: CaseEvaluator = Evaluator> {
    evaluator: Arc<E>,
    max_concurrent: usize,
}

impl<E: CaseEvaluator> TestManager<E> {
    pub fn new(evaluator: E, max_concurrent: usize) -> Self {
        Self {
            evaluator: Arc::new(evaluator),
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Evaluates every case and feeds results to `reporter` as they complete.
    ///
    /// Cancelling `cancel` or hitting a fatal error aborts every unfinished
    /// evaluation. All aborted tasks are awaited before this returns, so their
    /// child processes are killed and their working files removed by then.
    pub async fn run_all<R: Reporter>(
        &self,
        cases: Vec<TestCase>,
        reporter: &mut R,
        cancel: &CancellationToken,
    ) -> RunSummary {
        let total = cases.len();
        let mut summary = RunSummary::new(total);
        let slots = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();
        let mut names = HashMap::with_capacity(total);

        for case in cases {
            let evaluator = Arc::clone(&self.evaluator);
            let slots = Arc::clone(&slots);
            let name = case.name.clone();
            let handle = tasks.spawn(async move {
                // The semaphore is never closed.
                let _permit = slots.acquire_owned().await.ok();
                evaluator.evaluate(&case).await
            });
            names.insert(handle.id(), name);
        }

        tracing::info!(total, max_concurrent = self.max_concurrent, "Dispatched tests");

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled(), if !summary.stopping() => {
                    tracing::warn!(running = tasks.len(), "Interrupted, abandoning unfinished tests");
                    summary.interrupted = true;
                    tasks.abort_all();
                }

                joined = tasks.join_next_with_id() => {
                    let Some(joined) = joined else { break };
                    match joined {
                        Ok((_, Ok(verdict))) => {
                            summary.record(verdict.passed());
                            reporter.on_verdict(&verdict);
                        }
                        Ok((_, Err(err))) if err.is_fatal() => {
                            if !summary.stopping() {
                                tracing::error!("Aborting run: {}", err);
                                summary.aborted = Some(err.to_string());
                                tasks.abort_all();
                            }
                            continue;
                        }
                        Ok((id, Err(err))) => {
                            let name = names.get(&id).map(String::as_str).unwrap_or("unknown");
                            tracing::warn!(test = name, "Test could not be evaluated: {}", err);
                            summary.record(false);
                            reporter.on_error(name, &err.to_string());
                        }
                        Err(err) if err.is_cancelled() => continue,
                        Err(err) => {
                            let name = names.get(&err.id()).map(String::as_str).unwrap_or("unknown");
                            tracing::error!(test = name, "Test task failed: {}", err);
                            summary.record(false);
                            reporter.on_error(name, &format!("evaluation panicked: {}", err));
                        }
                    }
                    reporter.on_progress(summary.completed, total);
                }
            }
        }

        tracing::info!(
            passed = summary.passed,
            completed = summary.completed,
            total,
            interrupted = summary.interrupted,
            "Run finished"
        );
        summary
    }
}
