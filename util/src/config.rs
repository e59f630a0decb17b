//! Application configuration loaded from the environment.
//!
//! `AppConfig` is read once at startup from `.env` (if present) and environment
//! variables. Every value has a default, so a missing or malformed variable never
//! stops the harness from starting.

use std::env;
use std::path::PathBuf;

/// Represents the complete harness configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub project_name: String,
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub log_to_stderr: bool,
    pub tests_file: PathBuf,
    pub candidate_executable: Option<PathBuf>,
    /// `None` means the reference outcome is derived from each test's expected output.
    pub reference_executable: Option<PathBuf>,
    pub work_dir: PathBuf,
    pub max_concurrent: usize,
    pub timeout_ms: u64,
    pub memcheck_timeout_ms: u64,
    pub mem_check: bool,
    pub max_stack: bool,
    pub valgrind_path: PathBuf,
    pub verbose: bool,
    pub color: bool,
    pub summary_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_name: "difftest".into(),
            log_level: "info".into(),
            log_dir: "logs".into(),
            log_file: "difftest.log".into(),
            log_to_stderr: false,
            tests_file: PathBuf::from("tests.json"),
            candidate_executable: None,
            reference_executable: Some(PathBuf::from("sps-reference")),
            work_dir: env::temp_dir(),
            max_concurrent: 4,
            timeout_ms: 3_000,
            memcheck_timeout_ms: 30_000,
            mem_check: false,
            max_stack: false,
            valgrind_path: PathBuf::from("valgrind"),
            verbose: false,
            color: true,
            summary_file: None,
        }
    }
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Unset variables and values that fail to parse fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let string = |key: &str, default: String| lookup(key).unwrap_or(default);
        let flag = |key: &str, default: bool| {
            lookup(key)
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(default)
        };
        let path = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);

        let timeout_ms = parsed(&lookup, "TEST_TIMEOUT_MS").unwrap_or(defaults.timeout_ms);
        let memcheck_timeout_ms =
            parsed(&lookup, "MEMCHECK_TIMEOUT_MS").unwrap_or(timeout_ms.saturating_mul(10));

        // An explicitly empty REFERENCE_EXECUTABLE switches to expected-output mode.
        let reference_executable = match lookup("REFERENCE_EXECUTABLE") {
            Some(value) if value.trim().is_empty() => None,
            Some(value) => Some(PathBuf::from(value)),
            None => defaults.reference_executable,
        };

        Self {
            project_name: string("PROJECT_NAME", defaults.project_name),
            log_level: string("LOG_LEVEL", defaults.log_level),
            log_dir: string("LOG_DIR", defaults.log_dir),
            log_file: string("LOG_FILE", defaults.log_file),
            log_to_stderr: flag("LOG_TO_STDERR", defaults.log_to_stderr),
            tests_file: path("TESTS_FILE").unwrap_or(defaults.tests_file),
            candidate_executable: path("CANDIDATE_EXECUTABLE"),
            reference_executable,
            work_dir: path("WORK_DIR").unwrap_or(defaults.work_dir),
            max_concurrent: parsed::<usize, _>(&lookup, "MAX_CONCURRENT_TESTS")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_concurrent),
            timeout_ms,
            memcheck_timeout_ms,
            mem_check: flag("MEM_CHECK", defaults.mem_check),
            max_stack: flag("MAX_STACK", defaults.max_stack),
            valgrind_path: path("VALGRIND_PATH").unwrap_or(defaults.valgrind_path),
            verbose: flag("VERBOSE", defaults.verbose),
            color: flag("COLOR", defaults.color),
            summary_file: path("SUMMARY_FILE"),
        }
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring malformed {}={:?}, using default", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.max_concurrent, 4);
        assert_eq!(config.timeout_ms, 3_000);
        assert_eq!(config.memcheck_timeout_ms, 30_000);
        assert_eq!(config.tests_file, PathBuf::from("tests.json"));
        assert_eq!(config.reference_executable, Some(PathBuf::from("sps-reference")));
        assert!(!config.mem_check);
        assert!(config.color);
    }

    #[test]
    fn test_memcheck_timeout_follows_primary_timeout() {
        let config = AppConfig::from_lookup(lookup_from(&[("TEST_TIMEOUT_MS", "500")]));
        assert_eq!(config.timeout_ms, 500);
        assert_eq!(config.memcheck_timeout_ms, 5_000);

        let config = AppConfig::from_lookup(lookup_from(&[
            ("TEST_TIMEOUT_MS", "500"),
            ("MEMCHECK_TIMEOUT_MS", "900"),
        ]));
        assert_eq!(config.memcheck_timeout_ms, 900);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MAX_CONCURRENT_TESTS", "lots"),
            ("TEST_TIMEOUT_MS", "-3"),
        ]));
        assert_eq!(config.max_concurrent, 4);
        assert_eq!(config.timeout_ms, 3_000);
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let config = AppConfig::from_lookup(lookup_from(&[("MAX_CONCURRENT_TESTS", "0")]));
        assert_eq!(config.max_concurrent, 4);
    }

    #[test]
    fn test_empty_reference_selects_expected_outputs() {
        let config = AppConfig::from_lookup(lookup_from(&[("REFERENCE_EXECUTABLE", "")]));
        assert_eq!(config.reference_executable, None);
    }

    #[test]
    fn test_flags_accept_common_spellings() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MEM_CHECK", "TRUE"),
            ("MAX_STACK", "1"),
            ("VERBOSE", "yes"),
            ("COLOR", "false"),
        ]));
        assert!(config.mem_check);
        assert!(config.max_stack);
        assert!(config.verbose);
        assert!(!config.color);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        unsafe {
            env::set_var("MAX_CONCURRENT_TESTS", "7");
            env::set_var("SUMMARY_FILE", "out/summary.json");
        }
        let config = AppConfig::from_env();
        unsafe {
            env::remove_var("MAX_CONCURRENT_TESTS");
            env::remove_var("SUMMARY_FILE");
        }
        assert_eq!(config.max_concurrent, 7);
        assert_eq!(config.summary_file, Some(PathBuf::from("out/summary.json")));
    }
}
