use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use util::config::AppConfig;

/// Sets up the global subscriber: a daily rolling log file, plus stderr when
/// `LOG_TO_STDERR` is set. Stdout is left to the report.
///
/// Keep the returned guard alive for the whole run or buffered lines are lost.
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    if let Err(err) = util::paths::ensure_dir(&config.log_dir) {
        eprintln!("Cannot create log directory {}: {}", config.log_dir, err);
    }

    let file_appender = rolling::daily(&config.log_dir, &config.log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stderr_layer = config.log_to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true)
    });

    let env_filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    guard
}
