use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::AppConfig;

/// Valgrind's stack-frame limit used when a test opts into a large stack.
pub const LARGE_STACKFRAME_BYTES: u64 = 4_040_064;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecutionLimits {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Instrumented runs are much slower, so they get their own bound.
    #[serde(default = "default_memcheck_timeout_ms")]
    pub memcheck_timeout_ms: u64,
}

impl ExecutionLimits {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn memcheck_timeout(&self) -> Duration {
        Duration::from_millis(self.memcheck_timeout_ms)
    }
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            memcheck_timeout_ms: default_memcheck_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MemcheckOptions {
    #[serde(default = "default_valgrind_path")]
    pub tool: PathBuf,

    #[serde(default = "default_max_stackframe")]
    pub max_stackframe: u64,
}

impl MemcheckOptions {
    /// Valgrind arguments that precede the instrumented command.
    pub fn tool_args(&self, log_file: &std::path::Path, large_stack: bool) -> Vec<String> {
        let mut args = vec![
            "-q".to_string(),
            "--leak-check=full".to_string(),
            format!("--log-file={}", log_file.display()),
        ];
        if large_stack {
            args.push(format!("--max-stackframe={}", self.max_stackframe));
        }
        args
    }
}

impl Default for MemcheckOptions {
    fn default() -> Self {
        Self {
            tool: default_valgrind_path(),
            max_stackframe: default_max_stackframe(),
        }
    }
}

/// Everything a single test execution needs to know about its environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub limits: ExecutionLimits,

    #[serde(default)]
    pub memcheck: MemcheckOptions,

    /// Directory that receives the per-run working files.
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            limits: ExecutionLimits::default(),
            memcheck: MemcheckOptions::default(),
            work_dir: default_work_dir(),
        }
    }
}

impl ExecutionConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            limits: ExecutionLimits {
                timeout_ms: config.timeout_ms,
                memcheck_timeout_ms: config.memcheck_timeout_ms,
            },
            memcheck: MemcheckOptions {
                tool: config.valgrind_path.clone(),
                max_stackframe: default_max_stackframe(),
            },
            work_dir: config.work_dir.clone(),
        }
    }

    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.limits.timeout_ms = timeout_ms;
        self
    }
}

fn default_timeout_ms() -> u64 {
    3_000
}
fn default_memcheck_timeout_ms() -> u64 {
    30_000
}
fn default_valgrind_path() -> PathBuf {
    PathBuf::from("valgrind")
}
fn default_max_stackframe() -> u64 {
    LARGE_STACKFRAME_BYTES
}
fn default_work_dir() -> PathBuf {
    std::env::temp_dir()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ExecutionConfig =
            serde_json::from_str(r#"{ "limits": { "timeout_ms": 250 } }"#).unwrap();
        assert_eq!(config.limits.timeout_ms, 250);
        assert_eq!(config.limits.memcheck_timeout_ms, 30_000);
        assert_eq!(config.memcheck.tool, PathBuf::from("valgrind"));
        assert_eq!(config.memcheck.max_stackframe, LARGE_STACKFRAME_BYTES);
    }

    #[test]
    fn test_from_app_config_copies_limits() {
        let app = AppConfig {
            timeout_ms: 1_200,
            memcheck_timeout_ms: 12_000,
            valgrind_path: PathBuf::from("/opt/valgrind/bin/valgrind"),
            work_dir: PathBuf::from("/scratch"),
            ..AppConfig::default()
        };
        let config = ExecutionConfig::from_app_config(&app);
        assert_eq!(config.limits.timeout(), Duration::from_millis(1_200));
        assert_eq!(config.limits.memcheck_timeout(), Duration::from_secs(12));
        assert_eq!(config.memcheck.tool, PathBuf::from("/opt/valgrind/bin/valgrind"));
        assert_eq!(config.work_dir, PathBuf::from("/scratch"));
    }

    #[test]
    fn test_tool_args_add_stackframe_only_for_large_stack() {
        let options = MemcheckOptions::default();
        let log = Path::new("/tmp/diag.log");

        let args = options.tool_args(log, false);
        assert_eq!(args, vec!["-q", "--leak-check=full", "--log-file=/tmp/diag.log"]);

        let args = options.tool_args(log, true);
        assert_eq!(args.last().unwrap(), "--max-stackframe=4040064");
    }
}
