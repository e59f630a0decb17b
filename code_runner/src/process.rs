use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;

use tokio::process::{Child, Command};
use tokio::time::timeout;
use util::execution_config::ExecutionConfig;
use uuid::Uuid;

use crate::error::RunnerError;
use crate::outcome::{RunOutcome, Termination};
use crate::working_file::WorkingFile;

/// Runs `executable arguments... <working file>` once and classifies the result.
///
/// The pristine `input` is copied to a fresh working file that doubles as the
/// program's output channel. That file is removed before this returns, whatever
/// the outcome. A timed out process is killed and its output is discarded.
///
/// # Errors
/// - [`RunnerError::Launch`] if the executable cannot be started.
/// - [`RunnerError::WorkingFile`] if the working copy cannot be created or read back.
#[tracing::instrument(
    name = "run",
    skip_all,
    fields(executable = %executable.display(), run_id = %Uuid::new_v4())
)]
pub async fn run(
    executable: &Path,
    arguments: &[String],
    input: &Path,
    config: &ExecutionConfig,
) -> Result<RunOutcome, RunnerError> {
    let working = WorkingFile::copy_of(input, &config.work_dir).await?;

    let mut child = Command::new(executable)
        .args(arguments)
        .arg(working.path())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .process_group(0)
        .spawn()
        .map_err(|source| RunnerError::Launch {
            executable: executable.to_path_buf(),
            source,
        })?;

    let _group = ProcessGroup::of(&child);
    let started = Instant::now();
    let status = wait_with_timeout(&mut child, config.limits.timeout())
        .await
        .map_err(|source| RunnerError::Wait {
            executable: executable.to_path_buf(),
            source,
        })?;

    let Some(status) = status else {
        tracing::debug!("Timed out after {:?}", config.limits.timeout());
        return Ok(RunOutcome::TimedOut);
    };

    let termination = Termination::from(status);
    tracing::debug!("Finished with {} in {:?}", termination, started.elapsed());

    if let Some(outcome) = RunOutcome::from_failed_termination(termination) {
        return Ok(outcome);
    }

    let bytes = working.read().await?;
    Ok(RunOutcome::from_artifact(bytes))
}

/// Waits for `child` up to `limit`. `Ok(None)` means it timed out and was killed,
/// together with everything else in its process group.
pub(crate) async fn wait_with_timeout(
    child: &mut Child,
    limit: Duration,
) -> io::Result<Option<ExitStatus>> {
    match timeout(limit, child.wait()).await {
        Ok(status) => status.map(Some),
        Err(_) => {
            ProcessGroup::of(child).kill();
            if let Err(e) = child.kill().await {
                tracing::warn!("Failed to kill timed out process: {}", e);
            }
            Ok(None)
        }
    }
}

/// The process group led by a child spawned with `process_group(0)`.
///
/// Dropping it kills every process still in the group, so anything the child
/// forked does not outlive the run.
pub(crate) struct ProcessGroup(Option<Pid>);

impl ProcessGroup {
    pub(crate) fn of(child: &Child) -> Self {
        Self(
            child
                .id()
                .and_then(|id| i32::try_from(id).ok())
                .map(Pid::from_raw),
        )
    }

    pub(crate) fn kill(&self) {
        let Some(pgid) = self.0 else { return };
        match killpg(pgid, Signal::SIGKILL) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(e) => tracing::warn!("Failed to kill process group {}: {}", pgid, e),
        }
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        self.kill();
    }
}
