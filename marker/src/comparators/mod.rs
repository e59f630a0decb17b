//! # Comparators
//!
//! Implementations of [`OutputComparator`](crate::traits::comparator::OutputComparator).
//!
//! - [`exact_comparator`]: the outcomes must be the same variant with byte-identical text.

pub mod exact_comparator;
