//! Shared building blocks for the difftest workspace: configuration, the test case
//! data model, path helpers and valgrind log parsing.

pub mod config;
pub mod execution_config;
pub mod paths;
pub mod test_case;
pub mod test_helpers;
pub mod valgrind_report;
