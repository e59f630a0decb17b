use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static DEFINITELY_LOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"definitely lost:\s*([0-9,]+)\s*bytes").expect("valid regex"));
static ERROR_SUMMARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ERROR SUMMARY:\s*([0-9,]+)\s*errors").expect("valid regex"));

/// Headline numbers pulled out of a valgrind log.
///
/// `-q` logs only contain the summary lines when something went wrong, so both
/// fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValgrindSummary {
    pub bytes_definitely_lost: Option<u64>,
    pub error_count: Option<u64>,
}

impl ValgrindSummary {
    pub fn parse(log: &str) -> Self {
        Self {
            bytes_definitely_lost: first_number(&DEFINITELY_LOST, log),
            error_count: first_number(&ERROR_SUMMARY, log),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes_definitely_lost.is_none() && self.error_count.is_none()
    }

    pub fn leaked(&self) -> bool {
        self.bytes_definitely_lost.is_some_and(|b| b > 0)
    }

    /// One-line description, `None` when the log had no summary lines.
    pub fn headline(&self) -> Option<String> {
        match (self.bytes_definitely_lost, self.error_count) {
            (None, None) => None,
            (Some(bytes), None) => Some(format!("definitely lost: {} bytes", bytes)),
            (None, Some(errors)) => Some(format!("{} errors", errors)),
            (Some(bytes), Some(errors)) => {
                Some(format!("definitely lost: {} bytes, {} errors", bytes, errors))
            }
        }
    }
}

fn first_number(re: &Regex, content: &str) -> Option<u64> {
    re.captures_iter(content)
        .filter_map(|cap| cap[1].replace(',', "").parse::<u64>().ok())
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEAKY_LOG: &str = r#"==22==
==22== HEAP SUMMARY:
==22==     in use at exit: 1,100 bytes in 2 blocks
==22==   total heap usage: 13 allocs, 11 frees, 79,320 bytes allocated
==22==
==22== 1,100 bytes in 2 blocks are definitely lost in loss record 1 of 1
==22==    at 0x48AEF8F: malloc (in /usr/libexec/valgrind/vgpreload_memcheck-amd64-linux.so)
==22==    by 0x10D44F: table_load (in /code/sps)
==22==    by 0x10C1A2: main (in /code/sps)
==22==
==22== LEAK SUMMARY:
==22==    definitely lost: 1,100 bytes in 2 blocks
==22==    indirectly lost: 0 bytes in 0 blocks
==22==      possibly lost: 0 bytes in 0 blocks
==22==    still reachable: 0 bytes in 0 blocks
==22==         suppressed: 0 bytes in 0 blocks
==22==
==22== ERROR SUMMARY: 1 errors from 1 contexts (suppressed: 0 from 0)
"#;

    #[test]
    fn test_parses_leak_and_error_counts() {
        let summary = ValgrindSummary::parse(LEAKY_LOG);
        assert_eq!(summary.bytes_definitely_lost, Some(1100));
        assert_eq!(summary.error_count, Some(1));
        assert!(summary.leaked());
        assert_eq!(
            summary.headline().as_deref(),
            Some("definitely lost: 1100 bytes, 1 errors")
        );
    }

    #[test]
    fn test_uninitialised_read_without_leak_summary() {
        let log = "==7== Conditional jump or move depends on uninitialised value(s)\n\
                   ==7==    at 0x109182: main (sps.c:12)\n";
        let summary = ValgrindSummary::parse(log);
        assert!(summary.is_empty());
        assert!(!summary.leaked());
        assert_eq!(summary.headline(), None);
    }
}
