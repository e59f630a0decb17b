//! # Test Manager
//!
//! Loads a test list, schedules evaluations with bounded concurrency and reports
//! the results. The `difftest` binary wires these pieces to the environment.

pub mod error;
pub mod loader;
pub mod logging;
pub mod manager;
