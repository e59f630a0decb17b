//main.rs
use marker::report::ReportStyle;
use marker::{Evaluator, ReferenceSource};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use test_manager::error::ManagerError;
use test_manager::loader::load_tests;
use test_manager::logging::init_logging;
use test_manager::manager::manager::TestManager;
use test_manager::manager::reporter::ConsoleReporter;
use tokio_util::sync::CancellationToken;
use util::config::AppConfig;
use util::execution_config::ExecutionConfig;
use util::paths::{ensure_dir, ensure_parent_dir};

#[tokio::main]
async fn main() -> ExitCode {
    let config = AppConfig::from_env();
    let _guard = init_logging(&config);

    tracing::info!(project = %config.project_name, "Starting");

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), ManagerError> {
    let candidate = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.candidate_executable.clone())
        .ok_or(ManagerError::NoCandidate)?;

    let cases = load_tests(&config.tests_file, config.mem_check, config.max_stack)?;

    let execution = ExecutionConfig::from_app_config(&config);
    ensure_dir(&execution.work_dir).map_err(|source| ManagerError::WorkDir {
        path: execution.work_dir.clone(),
        source,
    })?;

    let style = ReportStyle::new(config.color && io::stdout().is_terminal());
    let reference = ReferenceSource::from_option(config.reference_executable.clone());
    tracing::info!(candidate = %candidate.display(), reference = ?reference, "Evaluating");

    let evaluator = Evaluator::new(&candidate, reference, execution).with_style(style);
    let manager = TestManager::new(evaluator, config.max_concurrent);

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let mut reporter = ConsoleReporter::new(
        io::stdout(),
        cases.len(),
        config.verbose,
        config.mem_check,
        style,
    );
    let summary = manager.run_all(cases, &mut reporter, &cancel).await;
    let (_, report) = reporter.finish(&summary);

    if let Some(path) = &config.summary_file {
        write_report(path, &report)?;
    }

    match summary.aborted {
        Some(reason) => Err(ManagerError::Aborted(reason)),
        None => Ok(()),
    }
}

fn write_report(path: &Path, report: &marker::report::RunReport) -> Result<(), ManagerError> {
    let to_error = |source| ManagerError::WriteReport {
        path: path.to_path_buf(),
        source,
    };
    let json = report.to_json().map_err(|err| to_error(err.into()))?;
    ensure_parent_dir(path).map_err(to_error)?;
    std::fs::write(path, json).map_err(to_error)?;
    tracing::info!(path = %path.display(), "Wrote run report");
    Ok(())
}
