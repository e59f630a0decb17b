//! Re-runs a program under valgrind and reports what it found.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use util::execution_config::ExecutionConfig;
use uuid::Uuid;

use crate::error::RunnerError;
use crate::outcome::MemorySafetyResult;
use crate::process::{ProcessGroup, wait_with_timeout};
use crate::working_file::WorkingFile;

/// Runs the program under the configured memory checker on its own working file.
///
/// Whatever valgrind writes to its log is the result: an empty log is
/// [`MemorySafetyResult::Clean`], anything else is reported verbatim as a
/// violation. The exit status of the instrumented program is not considered;
/// the primary run already classified it.
///
/// This never fails. A missing tool, an I/O problem or a timeout is reported as
/// a violation describing the fault, so a broken checker cannot pass as clean.
#[tracing::instrument(
    name = "memcheck",
    skip_all,
    fields(executable = %executable.display(), run_id = %Uuid::new_v4())
)]
pub async fn check(
    executable: &Path,
    arguments: &[String],
    input: &Path,
    large_stack: bool,
    config: &ExecutionConfig,
) -> MemorySafetyResult {
    match instrumented_run(executable, arguments, input, large_stack, config).await {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!("Memory check could not run: {}", err);
            MemorySafetyResult::Violation(format!("memory check could not run: {}\n", err))
        }
    }
}

async fn instrumented_run(
    executable: &Path,
    arguments: &[String],
    input: &Path,
    large_stack: bool,
    config: &ExecutionConfig,
) -> Result<MemorySafetyResult, RunnerError> {
    let tool = &config.memcheck.tool;
    let working = WorkingFile::copy_of(input, &config.work_dir).await?;
    let log = WorkingFile::empty(&config.work_dir, "memcheck")?;

    let mut child = Command::new(tool)
        .args(config.memcheck.tool_args(log.path(), large_stack))
        .arg(executable)
        .args(arguments)
        .arg(working.path())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .process_group(0)
        .spawn()
        .map_err(|source| RunnerError::Launch {
            executable: tool.clone(),
            source,
        })?;

    let _group = ProcessGroup::of(&child);
    let limit = config.limits.memcheck_timeout();
    let status = wait_with_timeout(&mut child, limit)
        .await
        .map_err(|source| RunnerError::Wait {
            executable: tool.clone(),
            source,
        })?;

    if status.is_none() {
        return Ok(MemorySafetyResult::Violation(format!(
            "memory check timed out after {} ms\n",
            limit.as_millis()
        )));
    }

    let diagnostic = String::from_utf8_lossy(&log.read().await?).into_owned();
    if diagnostic.is_empty() {
        Ok(MemorySafetyResult::Clean)
    } else {
        tracing::debug!("Memory checker reported {} bytes of diagnostics", diagnostic.len());
        Ok(MemorySafetyResult::Violation(diagnostic))
    }
}
