//! Traits Module
//!
//! - [`comparator`]: the strategy trait for comparing a candidate outcome with the
//!   reference outcome.

pub mod comparator;
